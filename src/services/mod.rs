pub mod admin;
pub mod bitquery;
pub mod discovery;
pub mod error;
pub mod fallback;
pub mod ledger;
pub mod payment;
pub mod pumpfun;
pub mod token;

pub use discovery::{Aggregator, Listing, Tier, TokenFeed};
pub use error::{FeedError, ServiceError};
pub use fallback::StaticFeed;
pub use ledger::LedgerClient;
pub use payment::PaymentService;
pub use token::TokenService;
