use super::*;
use crate::domain::{Creator, Game, GameId, Store};

#[test]
fn decodes_games_page_with_next_cursor() {
    let body = br#"{
        "count": 2,
        "next": "https://api.rawg.io/api/games?key=k&page=2",
        "previous": null,
        "results": [
            {"id": 3498, "name": "Grand Theft Auto V", "slug": "grand-theft-auto-v",
             "released": "2013-09-17", "background_image": "https://media.rawg.io/a.jpg",
             "rating": 4.47, "rating_top": 5},
            {"id": 3328, "name": "The Witcher 3", "slug": "the-witcher-3",
             "released": null, "background_image": null, "rating": 4.66, "rating_top": 5}
        ]
    }"#;

    let page: Page<Game> = decode_page(body).expect("decode");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, GameId(3498));
    assert_eq!(
        page.items[0].released.map(|d| d.to_string()).as_deref(),
        Some("2013-09-17")
    );
    assert!(page.items[1].released.is_none());
    assert_eq!(
        page.next_cursor.as_deref(),
        Some("https://api.rawg.io/api/games?key=k&page=2")
    );
}

#[test]
fn null_or_blank_next_marks_last_page() {
    let null_next: Page<Store> =
        decode_page(br#"{"next": null, "results": []}"#).expect("decode");
    assert!(null_next.is_last());

    let blank_next: Page<Store> =
        decode_page(br#"{"next": "", "results": []}"#).expect("decode");
    assert!(blank_next.is_last());

    let missing_next: Page<Store> = decode_page(br#"{"results": []}"#).expect("decode");
    assert!(missing_next.is_last());
}

#[test]
fn creator_nested_games_and_positions_decode() {
    let body = br#"{"next": null, "results": [
        {"id": 1, "name": "Hideo Kojima", "image": null, "image_background": "bg.jpg",
         "positions": [{"id": 1, "name": "director", "slug": "director"}],
         "games": [{"id": 10, "name": "Death Stranding", "slug": "death-stranding", "added": 9001}]}
    ]}"#;

    let page: Page<Creator> = decode_page(body).expect("decode");
    let creator = &page.items[0];
    assert_eq!(creator.positions[0].name, "director");
    assert_eq!(creator.games[0].added, 9001);
}

#[test]
fn missing_results_is_decode_error() {
    let err = decode_page::<Game>(br#"{"detail": "Not found."}"#).expect_err("must fail");
    assert!(matches!(err, FetchError::Decode(_)));
}

#[test]
fn cursor_requests_redact_the_key_for_display() {
    let request =
        PageRequest::Cursor("https://api.rawg.io/api/games?key=SECRET123&page=2".into());
    assert_eq!(
        request.redacted(),
        "https://api.rawg.io/api/games?key=***&page=2"
    );
    assert_eq!(PageRequest::Initial.redacted(), "initial");
}

#[test]
fn redaction_handles_unparseable_cursors() {
    assert_eq!(
        redact_api_key("api.rawg.io/api/games?page=2&key=SECRET123#top"),
        "api.rawg.io/api/games?page=2&key=***#top"
    );
    assert_eq!(redact_api_key("key=SECRET123"), "key=***");
    assert_eq!(redact_api_key("no query here"), "no query here");
    assert_eq!(
        redact_api_key("https://x/games?monkey=1&page=3"),
        "https://x/games?monkey=1&page=3"
    );
}
