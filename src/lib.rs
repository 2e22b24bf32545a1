//! Procedural retail shelf stocking on top of Bevy.

pub mod stocking;
