//! API clients for external services
//!
//! - Cinemeta: canonical title/year metadata for content ids
//! - Debrid providers: DebridLink, Real-Debrid, AllDebrid, Premiumize, TorBox
//!
//! Every client normalizes its provider's response shape into the shared
//! models at this boundary.

pub mod all_debrid;
pub mod cinemeta;
pub mod debrid_link;
pub mod premiumize;
pub mod real_debrid;
pub mod torbox;

pub use all_debrid::AllDebridClient;
pub use cinemeta::CinemetaClient;
pub use debrid_link::DebridLinkClient;
pub use premiumize::PremiumizeClient;
pub use real_debrid::RealDebridClient;
pub use torbox::TorBoxClient;
