//! Domain model (ids, categories, candidates, offers, lifecycle).

pub mod assignment;
pub mod candidate;
pub mod category;
pub mod errors;
pub mod ids;
pub mod offer;
pub mod reply;

pub use assignment::{AssignmentOutcome, AssignmentRequest, AssignmentState, OfferResolution};
pub use candidate::{Availability, CandidateRecord, ContactId};
pub use category::Category;
pub use errors::DocketError;
pub use ids::{AssignmentId, OfferId};
pub use offer::Offer;
pub use reply::ReplyToken;
