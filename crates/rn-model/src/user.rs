//! The `RoadUser` trait implemented by every object placed on a road model.

use std::any::{Any, TypeId};
use std::fmt;

use rn_core::ObjectId;

/// Upcast helper so a `&dyn RoadUser` can be inspected as `&dyn Any`.
///
/// Blanket-implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An agent that can be registered on a [`RoadModel`](crate::RoadModel).
///
/// The road model only needs two things from an agent: a stable identity and
/// a travel speed.  Everything else (behaviour, cargo, state machines) is the
/// application's business and is reachable again through
/// [`RoadModel::get_as`](crate::RoadModel::get_as).
pub trait RoadUser: AsAny + fmt::Debug + 'static {
    /// Identity used for registration and lookups.  Must not change while the
    /// object is registered.
    fn id(&self) -> ObjectId;

    /// Travel speed in distance units per time unit.  Must be finite and
    /// positive for `follow_path` to accept the object.
    fn speed(&self) -> f64 {
        1.0
    }
}

impl dyn RoadUser {
    /// `true` if the concrete type behind this object is `T`.
    pub fn is<T: RoadUser>(&self) -> bool {
        self.concrete_type() == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: RoadUser>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: RoadUser>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// `TypeId` of the concrete type, looked up through the vtable.
    pub fn concrete_type(&self) -> TypeId {
        self.as_any().type_id()
    }
}
