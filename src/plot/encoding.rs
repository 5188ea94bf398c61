//! How node sizes and colors are derived.

use crate::figure::Color;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static COLOR_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(#([0-9a-f]{3}|[0-9a-f]{4}|[0-9a-f]{6}|[0-9a-f]{8})|(rgba?|hsla?)\([^()]*\))$")
        .unwrap()
});

/// CSS named colors, sorted.
const NAMED_COLORS: [&str; 149] = [
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue",
    "firebrick", "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold",
    "goldenrod", "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred",
    "indigo", "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon",
    "lightblue", "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray",
    "lightgreen", "lightgrey", "lightpink", "lightsalmon", "lightseagreen", "lightskyblue",
    "lightslategray", "lightslategrey", "lightsteelblue", "lightyellow", "lime",
    "limegreen", "linen", "magenta", "maroon", "mediumaquamarine", "mediumblue",
    "mediumorchid", "mediumpurple", "mediumseagreen", "mediumslateblue",
    "mediumspringgreen", "mediumturquoise", "mediumvioletred", "midnightblue", "mintcream",
    "mistyrose", "moccasin", "navajowhite", "navy", "oldlace", "olive", "olivedrab",
    "orange", "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise",
    "palevioletred", "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue",
    "purple", "rebeccapurple", "red", "rosybrown", "royalblue", "saddlebrown", "salmon",
    "sandybrown", "seagreen", "seashell", "sienna", "silver", "skyblue", "slateblue",
    "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan", "teal", "thistle",
    "tomato", "transparent", "turquoise", "violet", "wheat", "white", "whitesmoke",
    "yellow", "yellowgreen",
];

/// Whether `text` is a CSS color literal: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`,
/// `rgb(..)`, `rgba(..)`, `hsl(..)`, `hsla(..)` or a named color such as `red`.
pub fn is_color_literal(text: &str) -> bool {
    let text = text.trim();
    COLOR_LITERAL.is_match(text)
        || NAMED_COLORS
            .binary_search(&text.to_ascii_lowercase().as_str())
            .is_ok()
}

/// Marker size policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Encoding<f64>")]
pub enum SizeMethod {
    /// Degree plus [`SizeMethod::DEGREE_OFFSET`].
    Degree,
    /// [`SizeMethod::STATIC_SIZE`] for every node.
    Static,
    /// The numeric value of a node attribute.
    Attribute(String),
    /// One size per node, in node order.
    Values(Vec<f64>),
}

impl SizeMethod {
    pub const DEGREE_OFFSET: f64 = 12.0;
    pub const STATIC_SIZE: f64 = 28.0;
}

impl Default for SizeMethod {
    fn default() -> Self {
        SizeMethod::Degree
    }
}

impl From<&str> for SizeMethod {
    fn from(name: &str) -> Self {
        match name {
            "degree" => SizeMethod::Degree,
            "static" => SizeMethod::Static,
            attribute => SizeMethod::Attribute(attribute.to_string()),
        }
    }
}

impl From<Vec<f64>> for SizeMethod {
    fn from(values: Vec<f64>) -> Self {
        SizeMethod::Values(values)
    }
}

/// Marker color policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Encoding<Color>")]
pub enum ColorMethod {
    /// Degree, mapped through the color scale.
    Degree,
    /// The value of a node attribute; numbers go through the color scale.
    Attribute(String),
    /// The same literal color for every node.
    Fixed(String),
    /// One color per node, in node order.
    Values(Vec<Color>),
}

impl Default for ColorMethod {
    fn default() -> Self {
        ColorMethod::Degree
    }
}

impl From<&str> for ColorMethod {
    fn from(name: &str) -> Self {
        if name == "degree" {
            ColorMethod::Degree
        } else if is_color_literal(name) {
            ColorMethod::Fixed(name.to_string())
        } else {
            ColorMethod::Attribute(name.to_string())
        }
    }
}

impl From<Vec<Color>> for ColorMethod {
    fn from(values: Vec<Color>) -> Self {
        ColorMethod::Values(values)
    }
}

/// Serialized form shared by both policies: a name or an explicit list.
#[derive(Deserialize)]
#[serde(untagged)]
enum Encoding<T> {
    Values(Vec<T>),
    Named(String),
}

impl From<Encoding<f64>> for SizeMethod {
    fn from(encoding: Encoding<f64>) -> Self {
        match encoding {
            Encoding::Values(values) => SizeMethod::Values(values),
            Encoding::Named(name) => SizeMethod::from(name.as_str()),
        }
    }
}

impl From<Encoding<Color>> for ColorMethod {
    fn from(encoding: Encoding<Color>) -> Self {
        match encoding {
            Encoding::Values(values) => ColorMethod::Values(values),
            Encoding::Named(name) => ColorMethod::from(name.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_color_literals() {
        for literal in ["#fff", "#FFAA00", "#ffaa0080", "rgb(1, 2, 3)", "rgba(0,0,0,0.5)", "hsl(120, 50%, 50%)"] {
            assert!(is_color_literal(literal), "{literal}");
        }
        for named in ["red", "SteelBlue", " aliceblue", "yellowgreen", "transparent"] {
            assert!(is_color_literal(named), "{named}");
        }
        for other in ["weight", "#ggg", "#12345", "reddish", "rgb"] {
            assert!(!is_color_literal(other), "{other}");
        }
    }

    #[test]
    fn parses_color_methods() {
        assert_eq!(ColorMethod::from("degree"), ColorMethod::Degree);
        assert_eq!(ColorMethod::from("#123456"), ColorMethod::Fixed("#123456".into()));
        assert_eq!(ColorMethod::from("red"), ColorMethod::Fixed("red".into()));
        assert_eq!(ColorMethod::from("group"), ColorMethod::Attribute("group".into()));
    }

    #[test]
    fn parses_size_methods() {
        assert_eq!(SizeMethod::from("static"), SizeMethod::Static);
        assert_eq!(SizeMethod::from("weight"), SizeMethod::Attribute("weight".into()));
    }

    #[test]
    fn deserializes_names_and_lists() {
        let size: SizeMethod = serde_json::from_str("[1, 2.5]").unwrap();
        assert_eq!(size, SizeMethod::Values(vec![1.0, 2.5]));
        let color: ColorMethod = serde_json::from_str(r##"[1, "#fff"]"##).unwrap();
        assert_eq!(
            color,
            ColorMethod::Values(vec![Color::Value(1.0), Color::from("#fff")])
        );
        let color: ColorMethod = serde_json::from_str(r#""rgb(0,0,0)""#).unwrap();
        assert_eq!(color, ColorMethod::Fixed("rgb(0,0,0)".into()));
    }
}
