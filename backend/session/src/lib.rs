//! Interactive embed editing sessions.
//!
//! A session owns one embed draft and changes it only through control
//! activations routed by the [`ControlDispatcher`]. The [`SessionRegistry`]
//! opens sessions, serializes activations, delivers committed drafts and
//! expires idle sessions.

pub mod controls;
pub mod detection;
pub mod dispatch;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod machine;
pub mod registry;
pub mod render;
pub mod sink;
pub mod state;
pub mod types;

pub use controls::{ControlDef, ControlRegistry, ControlRow, ControlStyle, ControlsLayout, PanelButton};
pub use detection::{control_custom_id, detect_control, header_custom_id, is_embedtool_id};
pub use dispatch::{ControlDispatcher, ControlHandler, Transition};
pub use error::SessionError;
pub use machine::{Session, SessionContext, SessionStatus};
pub use registry::{OpenRequest, RegistrySettings, SessionHandle, SessionRegistry};
pub use render::{
    ChoiceOption, ChoiceSpec, FormInput, FormSpec, InputStyle, Rejection, RenderInstruction, Reply,
    TerminationResult,
};
pub use sink::{NullSink, PresentationSink};
pub use types::{ControlActivation, ControlId, FormValues, Payload, SessionId};
