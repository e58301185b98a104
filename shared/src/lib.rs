pub mod boundary;
pub mod export;
pub mod hunt;
pub mod location;
pub mod num;
pub mod point;
pub mod quota;
pub mod user;

pub use boundary::{BoundaryManifestEntry, LatLngBounds, ld_slug};
pub use hunt::{ActiveHunt, HuntLog};
pub use location::{LocationFields, LocationMode, ResolvedLocation};
pub use num::FlexNum;
pub use point::{Point, PointKind};
pub use quota::{DisplayRow, QuotaRow, QuotaStatus};
pub use user::{Role, User};
