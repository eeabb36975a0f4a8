pub mod color;
pub mod draft;
pub mod error;
pub mod fields;
pub mod traits;
pub mod tutorial;
pub mod types;
pub mod validation;

pub use color::parse_color;
pub use draft::{EmbedDraft, Field, Rgb};
pub use error::{DeliveryError, EmbedError, ValidationError};
pub use fields::{add_field, remove_field_at, set_field_at};
pub use traits::Delivery;
pub use tutorial::{TutorialImages, TutorialOverlay};
pub use types::{ChannelRef, ExistingMessage, MessageRef, SessionMode, UserIdentity};
pub use validation::{optional_text, optional_url, parse_bool};
