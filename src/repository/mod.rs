pub mod content;
pub mod engagement;

pub use content::ContentRepository;
pub use engagement::EngagementLedger;
