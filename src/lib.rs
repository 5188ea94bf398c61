//! Turn an attributed graph into an interactive plotly figure.
//!
//! # Example
//! ```no_run
//!use graphplot::prelude::*;
//!
//!let mut graph = Graph::directed();
//!graph.add_edge_with("Oslo", "Bergen", [("road", "E16")]);
//!graph.add_edge_with("Bergen", "Stavanger", [("road", "E39")]);
//!graph.set_node_attr("Oslo", "population", 709_000)?;
//!
//!let options = PlotOptions::new()
//!    .title("Roads")
//!    .layout(LayoutKind::Kamada)
//!    .edge_text(["road"])
//!    .node_text(["population"]);
//!
//!let mut figure = plot(&mut graph, &options)?;
//!let html = figure.to_html("roads")?;
//!
//!let oslo = graph.position("Oslo").unwrap();
//!figure.handle(HoverEvent::Hover(HoverPoints::single(0, oslo)))?;
//!# Ok::<(), graphplot::PlotError>(())
//! ```

pub mod error;
pub mod figure;
pub mod graph;
pub mod hover;
pub mod layout;
pub mod plot;

pub use error::{PlotError, Result};
pub use plot::plot;

pub mod prelude {
    pub use crate::error::{PlotError, Result};
    pub use crate::figure::{Color, ColorScale, Figure, TextPosition};
    pub use crate::graph::{AttrValue, Graph, GraphKind};
    pub use crate::hover::{HoverEvent, HoverPoints, HoverState};
    pub use crate::layout::{LayoutError, LayoutKind};
    pub use crate::plot::{plot, ColorMethod, PlotOptions, SizeMethod};
}
