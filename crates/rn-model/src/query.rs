//! Nearest-object, k-nearest, and radius queries.
//!
//! The functions here work on any sequence of [`Located`] objects; the
//! sequence order is the registration order and breaks distance ties (earlier
//! wins).  [`RoadModel::located`](crate::RoadModel::located) produces such a
//! sequence from the registry, but callers may build their own.
//!
//! Distances are [`Point::distance`] compared as raw `f64` values.  Nothing
//! here mutates state.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;

use rn_core::Point;

use crate::{ModelError, ModelResult, RoadUser};

/// An object paired with the point it occupies.
#[derive(Copy, Clone, Debug)]
pub struct Located<'a> {
    pub object: &'a dyn RoadUser,
    pub point: Point,
}

/// Which objects a query considers.
///
/// A predicate and a type restriction are two spellings of the same idea and
/// cannot be combined; write a predicate that checks the type if both are
/// needed.
#[derive(Copy, Clone, Default)]
pub enum Filter<'f> {
    /// Every object qualifies.
    #[default]
    All,
    /// Objects for which the predicate returns `true`.
    Predicate(&'f dyn Fn(&dyn RoadUser) -> bool),
    /// Objects whose concrete type has this `TypeId`.
    OfType(TypeId),
}

impl<'f> Filter<'f> {
    /// Restrict to objects of concrete type `T`.
    pub fn of_type<T: RoadUser>() -> Self {
        Filter::OfType(TypeId::of::<T>())
    }

    pub fn matches(&self, object: &dyn RoadUser) -> bool {
        match self {
            Filter::All => true,
            Filter::Predicate(pred) => pred(object),
            Filter::OfType(ty) => object.concrete_type() == *ty,
        }
    }
}

impl fmt::Debug for Filter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("All"),
            Filter::Predicate(_) => f.write_str("Predicate(..)"),
            Filter::OfType(ty) => f.debug_tuple("OfType").field(ty).finish(),
        }
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

/// The qualifying object nearest to `reference`, or `None` if nothing
/// qualifies.
///
/// # Errors
///
/// [`ModelError::InvalidArgument`] if `reference` or any object's point is
/// not finite.
pub fn closest<'a, I>(reference: Point, objects: I, filter: &Filter<'_>) -> ModelResult<Option<&'a dyn RoadUser>>
where
    I: IntoIterator<Item = Located<'a>>,
{
    check_reference(reference)?;
    let mut best: Option<(f64, &'a dyn RoadUser)> = None;
    for loc in objects {
        check_located(&loc)?;
        if !filter.matches(loc.object) {
            continue;
        }
        let d = reference.distance(loc.point);
        // Strictly closer only: the earlier object keeps a tie.
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, loc.object));
        }
    }
    Ok(best.map(|(_, o)| o))
}

/// Up to `k` qualifying objects, nearest first.
///
/// # Errors
///
/// [`ModelError::InvalidArgument`] if `reference` or any object's point is
/// not finite, or `k == 0`.
pub fn k_closest<'a, I>(
    reference: Point,
    objects: I,
    k: usize,
    filter: &Filter<'_>,
) -> ModelResult<Vec<&'a dyn RoadUser>>
where
    I: IntoIterator<Item = Located<'a>>,
{
    check_reference(reference)?;
    if k < 1 {
        return Err(ModelError::InvalidArgument("k must be at least 1".into()));
    }
    let mut ranked = rank(reference, objects, filter)?;
    ranked.truncate(k);
    Ok(ranked.into_iter().map(|r| r.object).collect())
}

/// Every qualifying object strictly closer to `reference` than `radius`,
/// nearest first.
///
/// The bound is exclusive: an object whose computed distance equals `radius`
/// is left out.
///
/// # Errors
///
/// [`ModelError::InvalidArgument`] if `reference` or any object's point is
/// not finite, or `radius` is negative or NaN.
pub fn within_radius<'a, I>(
    reference: Point,
    objects: I,
    radius: f64,
    filter: &Filter<'_>,
) -> ModelResult<Vec<&'a dyn RoadUser>>
where
    I: IntoIterator<Item = Located<'a>>,
{
    check_reference(reference)?;
    if radius.is_nan() || radius < 0.0 {
        return Err(ModelError::InvalidArgument(format!(
            "radius must be non-negative, got {radius}"
        )));
    }
    Ok(rank(reference, objects, filter)?
        .into_iter()
        .take_while(|r| r.distance < radius)
        .map(|r| r.object)
        .collect())
}

// ── Internals ─────────────────────────────────────────────────────────────────

struct Ranked<'a> {
    distance: f64,
    order: usize,
    object: &'a dyn RoadUser,
}

fn check_reference(reference: Point) -> ModelResult<()> {
    if !reference.is_finite() {
        return Err(ModelError::InvalidArgument(format!(
            "reference point must be finite, got {reference}"
        )));
    }
    Ok(())
}

fn check_located(loc: &Located<'_>) -> ModelResult<()> {
    if !loc.point.is_finite() {
        return Err(ModelError::InvalidArgument(format!(
            "{} is at non-finite point {}",
            loc.object.id(),
            loc.point
        )));
    }
    Ok(())
}

/// Qualifying objects sorted by `(distance, order)`.
fn rank<'a, I>(reference: Point, objects: I, filter: &Filter<'_>) -> ModelResult<Vec<Ranked<'a>>>
where
    I: IntoIterator<Item = Located<'a>>,
{
    let mut ranked = Vec::new();
    for (order, loc) in objects.into_iter().enumerate() {
        check_located(&loc)?;
        if filter.matches(loc.object) {
            ranked.push(Ranked {
                distance: reference.distance(loc.point),
                order,
                object: loc.object,
            });
        }
    }
    ranked.sort_unstable_by(by_distance_then_order);
    Ok(ranked)
}

fn by_distance_then_order(a: &Ranked<'_>, b: &Ranked<'_>) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then(a.order.cmp(&b.order))
}
