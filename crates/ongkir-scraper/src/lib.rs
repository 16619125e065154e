pub mod aggregate;
pub mod client;
pub mod error;
pub mod lookup;
pub mod pagination;
pub mod parse;
pub mod politeness;
pub mod source;

pub use aggregate::{aggregate, AggregateOutcome};
pub use client::CarrierClient;
pub use error::{FetchError, ScraperError};
pub use lookup::{LookupError, RecursiveTariff, TariffLookup, TariffQuery};
pub use pagination::{generate_page, Page, PageRequest};
pub use parse::{parse_fee_page, FeePage};
pub use politeness::PolitenessGate;
pub use source::{FeeFetcher, LocationResolver};
