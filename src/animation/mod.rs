mod easing;
mod timeline;

pub(crate) use easing::Easing;
pub(crate) use timeline::{FrameParams, Timeline};
