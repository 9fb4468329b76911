// Entity Models - the two flat, immutable tables of the taxonomy
//
// Categories reference their group by id; there is no nested tree to walk.

pub mod category;
pub mod group;

pub use category::Category;
pub use group::Group;
