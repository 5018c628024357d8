pub mod content;
pub mod notification;
pub mod user;
pub mod views;

pub use content::{Comment, CommentDraft, ContentDraft, ContentItem, ContentKind};
pub use notification::{Notification, NotificationAudience};
pub use user::UserProfile;
pub use views::{CommentView, ContentItemView, NotificationView};
