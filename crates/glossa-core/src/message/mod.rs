//! Message domain module.
//!
//! # Module Structure
//!
//! - `model`: the host-owned `Message` and its flags/metadata
//! - `fragment`: content fragments and helpers over fragment sequences

mod fragment;
mod model;

pub use fragment::{
    Fragment, FragmentId, FragmentPart, create_text_content_fragment, fragments_reduce_text,
    update_fragment_with_edited_text,
};
pub use model::{Message, MessageGenerator, MessageId, MessageRole, TokenStopReason, UserFlag};
