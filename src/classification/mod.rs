//! Skin color classification module
//!
//! Maps a sampled color onto the Monk reference scale, an undertone
//! category and depth/saturation descriptors. All three classifiers are
//! pure functions of the sample and may run in any order.

pub mod descriptor;
pub mod tone;
pub mod undertone;

pub use descriptor::{describe_skin, DepthBucket, SaturationBucket, SkinDescriptor};
pub use tone::{
    classify_tone, reference_scale, reference_tones, tone_by_rank, ReferenceScale, ReferenceTone,
    ToneClassification, MONK_SCALE,
};
pub use undertone::{classify_undertone, Undertone, UndertoneResult};
