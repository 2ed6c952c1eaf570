use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(GameId);
id_newtype!(StoreId);
id_newtype!(CreatorId);

/// Which paginated collection a list source is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Games,
    Stores,
    Creators,
}

impl CatalogKind {
    /// Path segment under the API base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            CatalogKind::Games => "games",
            CatalogKind::Stores => "stores",
            CatalogKind::Creators => "creators",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Games => "games",
            CatalogKind::Stores => "stores",
            CatalogKind::Creators => "creators",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub released: Option<NaiveDate>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_top: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Platform entries are nested one level deeper than genres on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub platform: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    pub id: GameId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub released: Option<NaiveDate>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_top: u32,
    #[serde(default)]
    pub description_raw: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub metacritic: Option<u32>,
    #[serde(default)]
    pub genres: Vec<NamedRef>,
    #[serde(default)]
    pub platforms: Vec<PlatformEntry>,
}

/// A game as it appears nested under a store or a creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRef {
    pub id: GameId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub added: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub image_background: Option<String>,
    #[serde(default)]
    pub games: Vec<GameRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: CreatorId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_background: Option<String>,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default)]
    pub games: Vec<GameRef>,
}
