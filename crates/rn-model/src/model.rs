//! `RoadModel` — the registry of road users and the movement engine.

use tracing::{debug, trace};

use rn_core::{ObjectId, Point, RoadConfig, RoadError};
use rn_graph::{DijkstraPathFinder, Graph, PathFinder};

use crate::query::{self, Filter, Located};
use crate::registry::Registry;
use crate::{ModelError, ModelResult, PathProgress, Position, RoadUser};

/// Tracks road users on a borrowed [`Graph`] and moves them along paths.
///
/// The graph is owned elsewhere and shared read-only for the lifetime `'g`;
/// the model only ever mutates its own registry.  All operations are
/// synchronous and either succeed completely or leave the model untouched.
///
/// # Example
///
/// ```
/// use rn_core::{ObjectId, Point};
/// use rn_graph::{Graph, ListGraph};
/// use rn_model::{RoadModel, RoadUser};
///
/// #[derive(Debug)]
/// struct Truck(ObjectId);
/// impl RoadUser for Truck {
///     fn id(&self) -> ObjectId { self.0 }
///     fn speed(&self) -> f64 { 2.0 }
/// }
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(10.0, 0.0);
/// let mut graph = ListGraph::new();
/// graph.add_connection(a, b).unwrap();
///
/// let mut model = RoadModel::new(&graph);
/// model.add_object_at(Truck(ObjectId(1)), a).unwrap();
/// let progress = model.follow_path(ObjectId(1), &[a, b], 2.5).unwrap();
/// assert_eq!(progress.distance, 5.0);
/// assert_eq!(model.position(ObjectId(1)).unwrap().point(), Point::new(5.0, 0.0));
/// ```
pub struct RoadModel<'g> {
    graph: &'g dyn Graph,
    config: RoadConfig,
    registry: Registry,
}

/// One step of a validated path.
struct Leg {
    from: Point,
    to: Point,
    length: f64,
    /// Distance already covered when the leg starts (non-zero only when the
    /// object begins mid-connection).
    offset: f64,
    /// Index of `to` in the caller's path.
    target: usize,
}

impl<'g> RoadModel<'g> {
    /// Create an empty model with the default [`RoadConfig`].
    pub fn new(graph: &'g dyn Graph) -> Self {
        Self { graph, config: RoadConfig::default(), registry: Registry::new() }
    }

    /// Create an empty model with a custom configuration.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidArgument`] if `config` fails validation.
    pub fn with_config(graph: &'g dyn Graph, config: RoadConfig) -> ModelResult<Self> {
        config.validate().map_err(|e| match e {
            RoadError::InvalidArgument(msg) => ModelError::InvalidArgument(msg),
            other => ModelError::InvalidArgument(other.to_string()),
        })?;
        Ok(Self { graph, config, registry: Registry::new() })
    }

    pub fn graph(&self) -> &'g dyn Graph {
        self.graph
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register `object` on the node `point`.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidPosition`] if `point` is not a graph node.
    /// - [`ModelError::DuplicateRegistration`] if the object's id is taken.
    pub fn add_object_at<U: RoadUser>(&mut self, object: U, point: Point) -> ModelResult<()> {
        if !self.graph.contains_node(point) {
            return Err(ModelError::InvalidPosition(format!("{point} is not a graph node")));
        }
        self.register(Box::new(object), Position::Node(point))
    }

    /// Register `object` wherever `existing` currently is, including part-way
    /// along a connection.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnregisteredObject`] if `existing` is unknown.
    /// - [`ModelError::DuplicateRegistration`] if the object's id is taken.
    pub fn add_object_at_same_position<U: RoadUser>(
        &mut self,
        object: U,
        existing: ObjectId,
    ) -> ModelResult<()> {
        let position = self.position(existing)?;
        self.register(Box::new(object), position)
    }

    fn register(&mut self, object: Box<dyn RoadUser>, position: Position) -> ModelResult<()> {
        let id = object.id();
        if self.registry.contains(id) {
            return Err(ModelError::DuplicateRegistration(id));
        }
        trace!(%id, at = %position.point(), "object registered");
        self.registry.push(object, position);
        Ok(())
    }

    /// Unregister `id` and hand the object back.  Later registrations keep
    /// their relative order.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnregisteredObject`] if `id` is unknown.
    pub fn remove_object(&mut self, id: ObjectId) -> ModelResult<Box<dyn RoadUser>> {
        let entry = self.registry.remove(id).ok_or(ModelError::UnregisteredObject(id))?;
        trace!(%id, "object removed");
        Ok(entry.object)
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// Current position of `id`.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnregisteredObject`] if `id` is unknown.
    pub fn position(&self, id: ObjectId) -> ModelResult<Position> {
        self.registry
            .get(id)
            .map(|e| e.position)
            .ok_or(ModelError::UnregisteredObject(id))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.registry.contains(id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&dyn RoadUser> {
        self.registry.get(id).map(|e| e.object())
    }

    /// Mutable access to a registered object's own state.  Identity must not
    /// be changed through it.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut dyn RoadUser> {
        let slot = self.registry.slot(id)?;
        Some(&mut *self.registry.entry_mut(slot).object)
    }

    /// The registered object `id`, if it is a `T`.
    pub fn get_as<T: RoadUser>(&self, id: ObjectId) -> Option<&T> {
        self.get(id)?.downcast_ref::<T>()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// All objects in registration order.
    pub fn objects(&self) -> impl Iterator<Item = &dyn RoadUser> + '_ {
        self.registry.iter().map(|e| e.object())
    }

    /// All objects with their positions, in registration order.
    pub fn objects_and_positions(&self) -> impl Iterator<Item = (&dyn RoadUser, Position)> + '_ {
        self.registry.iter().map(|e| (e.object(), e.position))
    }

    /// Objects whose current point is exactly `point`.
    pub fn objects_at(&self, point: Point) -> Vec<&dyn RoadUser> {
        self.registry
            .iter()
            .filter(|e| e.position.point() == point)
            .map(|e| e.object())
            .collect()
    }

    /// Objects whose concrete type is `T`, in registration order.
    pub fn objects_of_type<T: RoadUser>(&self) -> Vec<&T> {
        self.registry
            .iter()
            .filter_map(|e| e.object().downcast_ref::<T>())
            .collect()
    }

    /// Snapshot of the registry for the query functions in [`query`].
    pub fn located(&self) -> Vec<Located<'_>> {
        self.registry
            .iter()
            .map(|e| Located { object: e.object(), point: e.position.point() })
            .collect()
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Shortest route from `id`'s current position to `destination`.
    ///
    /// When the object is part-way along `a → b` the route starts at its
    /// current point and continues from `b`, so it can be fed directly into
    /// [`follow_path`](Self::follow_path).
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnregisteredObject`] if `id` is unknown.
    /// - [`ModelError::UnreachableDestination`] if no route exists.
    pub fn shortest_path_to(&self, id: ObjectId, destination: Point) -> ModelResult<Vec<Point>> {
        self.path_to_with(&DijkstraPathFinder, id, destination)
    }

    /// Like [`shortest_path_to`](Self::shortest_path_to) with a caller-chosen
    /// [`PathFinder`].
    pub fn path_to_with<P: PathFinder>(
        &self,
        finder: &P,
        id: ObjectId,
        destination: Point,
    ) -> ModelResult<Vec<Point>> {
        match self.position(id)? {
            Position::Node(p) => Ok(finder.route(self.graph, p, destination)?.points),
            pos @ Position::OnConnection { to, .. } => {
                let mut path = vec![pos.point()];
                path.extend(finder.route(self.graph, to, destination)?.points);
                Ok(path)
            }
        }
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Move `id` along `path` for at most `time_budget` time units at the
    /// object's speed.
    ///
    /// `path[0]` must be the object's current point.  Connections are
    /// consumed whole while the budget lasts; the object stops part-way along
    /// the first connection it cannot finish.
    ///
    /// A connection whose remainder is within [`RoadConfig::tolerance`] of
    /// the reachable distance counts as finished, and the reported
    /// `distance` never exceeds `time_budget * speed`.  Once a connection has
    /// been finished in this call, a reachable distance at or below the
    /// tolerance is dropped instead of starting the next connection.  The
    /// first connection always takes whatever budget is given, so repeated
    /// tiny budgets still make progress.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnregisteredObject`] if `id` is unknown.
    /// - [`ModelError::InvalidArgument`] for an empty path, a negative or
    ///   non-finite budget, or a speed that is not finite and positive.
    /// - [`ModelError::InvalidPosition`] if `path[0]` is not where the object
    ///   is.
    /// - [`ModelError::NoSuchConnection`] if two consecutive points are not
    ///   connected.  The whole path is checked before anything moves.
    pub fn follow_path(
        &mut self,
        id: ObjectId,
        path: &[Point],
        time_budget: f64,
    ) -> ModelResult<PathProgress> {
        let slot = self.registry.slot(id).ok_or(ModelError::UnregisteredObject(id))?;
        let (start, speed) = {
            let entry = self.registry.entry(slot);
            (entry.position, entry.object().speed())
        };

        let Some(&first) = path.first() else {
            return Err(ModelError::InvalidArgument("path is empty".into()));
        };
        if !time_budget.is_finite() || time_budget < 0.0 {
            return Err(ModelError::InvalidArgument(format!(
                "time budget must be finite and non-negative, got {time_budget}"
            )));
        }
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ModelError::InvalidArgument(format!(
                "speed of {id} must be finite and positive, got {speed}"
            )));
        }
        if first != start.point() {
            return Err(ModelError::InvalidPosition(format!(
                "path starts at {first} but {id} is at {}",
                start.point()
            )));
        }

        let legs = self.plan_legs(start, path)?;
        let progress = self.advance(start, &legs, path, speed, time_budget);

        self.registry.entry_mut(slot).position = progress.position;
        debug!(
            %id,
            distance = progress.distance,
            time = progress.time,
            at = %progress.position.point(),
            complete = progress.is_complete(),
            "path followed"
        );
        Ok(progress)
    }

    /// Validate `path` against the graph and turn it into legs.
    fn plan_legs(&self, start: Position, path: &[Point]) -> ModelResult<Vec<Leg>> {
        let mut legs = Vec::with_capacity(path.len().saturating_sub(1));
        let mut rest = 0;

        if let Position::OnConnection { from, to, offset, length } = start {
            if path.len() > 1 {
                if path[1] != to {
                    return Err(ModelError::NoSuchConnection { from: path[0], to: path[1] });
                }
                legs.push(Leg { from, to, length, offset, target: 1 });
                rest = 1;
            }
        }

        for (i, w) in path.windows(2).enumerate().skip(rest) {
            let length = self.graph.length(w[0], w[1])?;
            legs.push(Leg { from: w[0], to: w[1], length, offset: 0.0, target: i + 1 });
        }
        Ok(legs)
    }

    /// Consume `legs` in order until the path or the budget runs out.
    fn advance(
        &self,
        start: Position,
        legs: &[Leg],
        path: &[Point],
        speed: f64,
        time_budget: f64,
    ) -> PathProgress {
        let tolerance = self.config.tolerance;
        let max_distance = time_budget * speed;
        let mut time_left = time_budget;
        let mut distance: f64 = 0.0;
        let mut time: f64 = 0.0;
        let mut position = start;

        for (i, leg) in legs.iter().enumerate() {
            let left_on_leg = (leg.length - leg.offset).max(0.0);
            let reach = time_left * speed;

            // Residue left over after finishing a connection does not start
            // the next one.  Nothing moves on a zero budget either.
            if left_on_leg > tolerance && (reach <= 0.0 || (i > 0 && reach <= tolerance)) {
                return stopped(
                    distance.min(max_distance),
                    time.min(time_budget),
                    position,
                    &path[leg.target..],
                );
            }

            if reach + tolerance >= left_on_leg {
                let dt = left_on_leg / speed;
                distance += left_on_leg;
                time += dt;
                time_left = (time_left - dt).max(0.0);
                position = Position::Node(leg.to);
            } else {
                distance += reach;
                time += time_left;
                position = Position::OnConnection {
                    from: leg.from,
                    to: leg.to,
                    offset: leg.offset + reach,
                    length: leg.length,
                };
                return stopped(
                    distance.min(max_distance),
                    time.min(time_budget),
                    position,
                    &path[leg.target..],
                );
            }
        }

        PathProgress {
            distance: distance.min(max_distance),
            time: time.min(time_budget),
            position,
            remaining: Vec::new(),
        }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// See [`query::closest`].
    pub fn closest(&self, reference: Point, filter: &Filter<'_>) -> ModelResult<Option<&dyn RoadUser>> {
        query::closest(reference, self.located(), filter)
    }

    /// See [`query::k_closest`].
    pub fn k_closest(
        &self,
        reference: Point,
        k: usize,
        filter: &Filter<'_>,
    ) -> ModelResult<Vec<&dyn RoadUser>> {
        query::k_closest(reference, self.located(), k, filter)
    }

    /// See [`query::within_radius`].
    pub fn within_radius(
        &self,
        reference: Point,
        radius: f64,
        filter: &Filter<'_>,
    ) -> ModelResult<Vec<&dyn RoadUser>> {
        query::within_radius(reference, self.located(), radius, filter)
    }
}

/// Progress for a stop before the end of the path; `ahead` is the part of the
/// path not yet reached.
fn stopped(distance: f64, time: f64, position: Position, ahead: &[Point]) -> PathProgress {
    let mut remaining = Vec::with_capacity(ahead.len() + 1);
    remaining.push(position.point());
    remaining.extend_from_slice(ahead);
    PathProgress { distance, time, position, remaining }
}
