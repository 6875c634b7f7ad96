pub mod geometry;

pub use geometry::{
    longitude_to_angle, polar_point, AspectLine, Band, DegreeTick, HouseSector, PlanetMarker,
    Point, RingRadii, SignSegment, TickKind, WheelGeometry, WheelLayout,
};
