use super::types::{FlowGraph, Point};

/// Where a link's curve bends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CurveStyle {
	/// Midpoint pushed perpendicular to the chord.
	Bend {
		/// Push distance, in view-box units.
		offset: f64,
		/// Vertical span above which the link is left straight.
		steep_threshold: f64,
	},
	/// Control point at the chord's mid x, raised above the source.
	Lift {
		/// Rise above the source, in view-box units.
		height: f64,
	},
}

impl CurveStyle {
	/// Control point of the quadratic curve from `from` to `to`.
	pub fn control_point(&self, from: Point, to: Point) -> Point {
		let mid = from.midpoint(to);
		match *self {
			CurveStyle::Bend {
				offset,
				steep_threshold,
			} => {
				let (dx, dy) = (to.x - from.x, to.y - from.y);
				let len = dx.hypot(dy);
				if len < 1e-9 || dy.abs() > steep_threshold {
					return mid;
				}
				// (dy, -dx) points up for a left-to-right chord
				Point::new(mid.x + dy / len * offset, mid.y - dx / len * offset)
			}
			CurveStyle::Lift { height } => Point::new(mid.x, from.y - height),
		}
	}
}

/// Point at `t` in `[0, 1]` on the curve from `p0` to `p2` pulled toward `p1`.
pub fn quadratic_bezier(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
	let u = 1.0 - t;
	Point::new(
		u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
		u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
	)
}

/// A marker somewhere along a link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
	/// Order of the link it travels.
	pub link: usize,
	/// Progress from source (0) toward target (1).
	pub t: f64,
	/// Current position, in view-box units.
	pub position: Point,
}

/// One-shot travel along each link, timed from the moment the link went
/// active.
///
/// Holds no per-frame state: the same activation stamps and `now` always give
/// the same particles, however often frames are drawn.
#[derive(Clone, Debug)]
pub struct ParticleMotion {
	duration_ms: f64,
	style: CurveStyle,
}

impl ParticleMotion {
	/// Markers that take `duration_ms` to cross a link curved by `style`.
	pub fn new(duration_ms: f64, style: CurveStyle) -> Self {
		Self {
			duration_ms: duration_ms.max(1.0),
			style,
		}
	}

	/// Normalized travel at `now` for a link activated at `activated_at`.
	/// `None` while the link is inactive or once the marker has arrived.
	pub fn progress(&self, activated_at: Option<f64>, now: f64) -> Option<f64> {
		let t = (now - activated_at?) / self.duration_ms;
		(0.0..1.0).contains(&t).then_some(t)
	}

	/// Markers for every link still in flight. `activated_at` is indexed by
	/// link order.
	pub fn particles(
		&self,
		graph: &FlowGraph,
		activated_at: &[Option<f64>],
		now: f64,
	) -> Vec<Particle> {
		activated_at
			.iter()
			.enumerate()
			.take(graph.link_count())
			.filter_map(|(link, &at)| {
				let t = self.progress(at, now)?;
				let (from, to) = graph.link_points(link);
				let control = self.style.control_point(from, to);
				Some(Particle {
					link,
					t,
					position: quadratic_bezier(from, control, to, t),
				})
			})
			.collect()
	}

	/// Curve the markers follow.
	pub fn style(&self) -> CurveStyle {
		self.style
	}
}
