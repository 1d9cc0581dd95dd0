use leptos::prelude::*;

use crate::components::counter::MetricCard;
use crate::components::flow_graph::{Diagram, DiagramKind, FlowDiagramCanvas, GraphData, GraphNode};
use crate::error::ConfigError;

/// Problem-to-solution pipeline, swept left to right.
fn interactive_flow() -> Result<Diagram, ConfigError> {
	let stages = [
		("chaos", 100.0, 200.0, "🔀", "Complex Problem"),
		("analysis", 300.0, 100.0, "🔍", "Analysis"),
		("strategy", 500.0, 150.0, "📋", "Strategy"),
		("build", 700.0, 100.0, "🛠️", "Build"),
		("measure", 900.0, 200.0, "📊", "Measure"),
		("clarity", 1100.0, 200.0, "✨", "Clear Solution"),
	];
	let nodes = stages
		.iter()
		.enumerate()
		.map(|(i, (id, x, y, icon, label))| {
			GraphNode::new(id, *x, *y, icon, label).with_group(i as u32)
		})
		.collect();
	let data = stages
		.windows(2)
		.fold(GraphData::new(nodes, (1200.0, 400.0)), |data, pair| {
			let (from, to) = (pair[0].0, pair[1].0);
			data.link(&format!("{from}-{to}"), from, to)
		});
	Diagram::new(data, DiagramKind::Sweep(Default::default()))
}

/// Laid out on a 2:1 canvas: x runs 0..200, y 0..100.
fn product_flow() -> Result<Diagram, ConfigError> {
	let nodes = vec![
		GraphNode::new("users", 24.0, 35.0, "👥", "User Research"),
		GraphNode::new("data", 24.0, 65.0, "📊", "Data Analysis"),
		GraphNode::new("problem", 60.0, 50.0, "🎯", "Problem Definition"),
		GraphNode::new("solution", 96.0, 35.0, "💡", "Solution Design"),
		GraphNode::new("prototype", 96.0, 65.0, "🔧", "Prototype"),
		GraphNode::new("ship", 136.0, 50.0, "🚀", "Ship & Learn"),
		GraphNode::new("metrics", 176.0, 50.0, "📈", "Measure Impact"),
	];
	let data = GraphData::new(nodes, (200.0, 100.0))
		.link("research", "users", "problem")
		.link("define", "data", "problem")
		.link("design", "problem", "solution")
		.link("build", "solution", "prototype")
		.link("measure", "prototype", "ship")
		.link("iterate", "ship", "metrics");
	Diagram::new(data, DiagramKind::Reveal(Default::default()))
}

fn tech_stack() -> Result<Diagram, ConfigError> {
	let techs: [(&str, f64, f64, &str, &str, &[&str]); 8] = [
		("react", 50.0, 20.0, "⚛️", "React", &["node", "tailwind"]),
		("node", 50.0, 80.0, "🟢", "Node.js", &["postgres", "openai"]),
		("python", 15.0, 50.0, "🐍", "Python", &["openai", "aws"]),
		("openai", 85.0, 50.0, "🤖", "OpenAI", &["react", "node"]),
		("postgres", 30.0, 80.0, "🐘", "PostgreSQL", &["node"]),
		("aws", 70.0, 80.0, "☁️", "AWS", &["node", "python"]),
		("tailwind", 15.0, 20.0, "🎨", "Tailwind", &["react"]),
		("docker", 85.0, 20.0, "🐳", "Docker", &["node", "python"]),
	];
	let nodes = techs
		.iter()
		.map(|(id, x, y, icon, label, _)| GraphNode::new(id, *x, *y, icon, label))
		.collect();
	let data = techs
		.iter()
		.flat_map(|(id, .., connections)| connections.iter().map(move |to| (*id, *to)))
		.fold(GraphData::new(nodes, (100.0, 100.0)), |data, (from, to)| {
			data.link_unique(from, to)
		});
	Diagram::new(data, DiagramKind::HoverPulse(Default::default()))
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<section class="hero">
				<h1>"From complex problems to clear solutions"</h1>
				<div class="metrics">
					<MetricCard value=165.0 prefix="$" suffix="M+" label="Revenue Impact" />
					<MetricCard value=200.0 suffix="M+" label="Users Served" />
					<MetricCard value=15.0 suffix="+" label="AI Features Shipped" />
				</div>
			</section>

			<section class="diagram sweep">
				<h2>"How I work"</h2>
				<p class="subtitle">"Hover a stage to jump to it."</p>
				{interactive_flow()
					.map(|diagram| {
						view! { <FlowDiagramCanvas diagram=diagram height=Some(400.0) /> }
					})}
			</section>

			<section class="diagram reveal">
				<h2>"Product flow"</h2>
				{product_flow()
					.map(|diagram| {
						view! { <FlowDiagramCanvas diagram=diagram height=Some(420.0) /> }
					})}
			</section>

			<section class="diagram web">
				<h2>"Tech stack"</h2>
				<p class="subtitle">"Hover a technology to see what it talks to."</p>
				{tech_stack()
					.map(|diagram| {
						view! { <FlowDiagramCanvas diagram=diagram height=Some(420.0) /> }
					})}
			</section>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_graph::ViewTransform;

	#[test]
	fn product_flow_spans_a_wide_canvas() {
		let diagram = product_flow().unwrap();
		assert_eq!(diagram.graph().view_box(), (200.0, 100.0));

		let fit = ViewTransform::fit(diagram.graph().view_box(), 840.0, 420.0);
		assert!(fit.x.abs() < 1e-9 && fit.y.abs() < 1e-9);
		assert!((fit.k - 4.2).abs() < 1e-9);
		let xs: Vec<f64> = diagram.graph().nodes().iter().map(|n| n.position.x).collect();
		let (left, right) = (xs[0] * fit.k, xs[6] * fit.k);
		assert!(left < 840.0 * 0.15 && right > 840.0 * 0.85);
	}

	#[test]
	fn site_content_is_valid() {
		assert!(interactive_flow().is_ok());
		assert!(tech_stack().is_ok());
		assert_eq!(product_flow().unwrap().graph().link_count(), 6);
	}
}
