//! Moon analysis: void of course, projection of upcoming aspects, and the
//! Moon's story.

pub mod projection;
pub mod story;
pub mod void;

pub use projection::{FutureAspectEvent, FutureAspectProjector};
pub use story::{
    lunar_mansion, timing_description, LunarAspect, LunarMansion, MoonPhase, MoonStory,
    MoonStoryBuilder, SpeedCategory,
};
pub use void::{degrees_to_next_sign, VoidDetector, VoidRule, VoidStatus, NO_APPLYING_REASON};
