pub mod feed;
pub mod notifications;
pub mod presence;
pub mod story_groups;
pub mod tags;
pub mod timestamps;

pub use feed::{Feed, FeedAggregator};
pub use notifications::{ChannelHalf, ChannelState, NotificationAggregator, NotificationSubscription};
pub use presence::PresenceService;
pub use story_groups::{group_stories, AuthorSummary, StoryGroups};
pub use tags::extract_hashtags;
