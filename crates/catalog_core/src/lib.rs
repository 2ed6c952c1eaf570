//! Paginated catalog browsing: remote list sources, the list controller that
//! accumulates their pages, the scroll trigger that drives it, and the render
//! contract for whatever displays the result.

pub mod config;
pub mod controller;
pub mod presentation;
pub mod scroll;
pub mod session;
pub mod source;

pub use config::{load_settings, CatalogSettings, PresentationSettings};
pub use controller::{ListController, ListEvent, ListState, LoadOutcome};
pub use presentation::{plan, render_text, CatalogCard, RenderPlan, Screen};
pub use scroll::{ScrollMetrics, ScrollTrigger};
pub use session::{DiamondCounter, Session, UserProfile};
pub use source::{RawgClient, RawgListSource, RemoteListSource};
