// Categorical and color-keyword product filters
use crate::{Product, ProductId};
use serde::Serialize;

pub trait Filter {
    fn matches(&self, product: &Product) -> bool;

    /// Keep matching products, preserving input order
    fn apply<'a, I>(&self, products: I) -> Vec<&'a Product>
    where
        I: IntoIterator<Item = &'a Product>,
        Self: Sized,
    {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Same gender and article type as a reference product, excluding one id
#[derive(Debug, Clone)]
pub struct AttributeFilter<'a> {
    exclude_id: &'a ProductId,
    gender: &'a str,
    article_type: &'a str,
}

impl<'a> AttributeFilter<'a> {
    pub fn new(exclude_id: &'a ProductId, gender: &'a str, article_type: &'a str) -> Self {
        Self {
            exclude_id,
            gender,
            article_type,
        }
    }

    /// Filter for products sharing the anchor's gender and article type
    pub fn for_anchor(anchor: &'a Product) -> Self {
        Self::new(&anchor.id, &anchor.gender, &anchor.article_type)
    }
}

impl Filter for AttributeFilter<'_> {
    fn matches(&self, product: &Product) -> bool {
        product.id != *self.exclude_id
            && product.gender == self.gender
            && product.article_type == self.article_type
    }
}

/// Recognized color keywords, in match priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Red,
    Green,
    Yellow,
    Black,
    White,
    Pink,
    Purple,
    Orange,
    Grey,
    Brown,
}

impl Color {
    pub const ALL: [Color; 11] = [
        Color::Blue,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Black,
        Color::White,
        Color::Pink,
        Color::Purple,
        Color::Orange,
        Color::Grey,
        Color::Brown,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Black => "black",
            Color::White => "white",
            Color::Pink => "pink",
            Color::Purple => "purple",
            Color::Orange => "orange",
            Color::Grey => "grey",
            Color::Brown => "brown",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// First vocabulary color contained in `text`, case-insensitive.
///
/// This is plain substring containment: "bluish" counts as blue and
/// "not red" still counts as red.
pub fn extract_color(text: &str) -> Option<Color> {
    let lowered = text.to_lowercase();
    Color::ALL
        .into_iter()
        .find(|color| lowered.contains(color.keyword()))
}

/// Products whose description is attributed the given color
#[derive(Debug, Clone, Copy)]
pub struct ColorFilter {
    color: Color,
}

impl ColorFilter {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    /// `None` when the query names no recognized color
    pub fn from_query(query_text: &str) -> Option<Self> {
        extract_color(query_text).map(Self::new)
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Filter for ColorFilter {
    fn matches(&self, product: &Product) -> bool {
        // A description is attributed only its first-matching color
        extract_color(&product.description) == Some(self.color)
    }
}

/// Products other than `exclude_id` with the given gender and article type
pub fn filter_by_attributes<'a, I>(
    products: I,
    exclude_id: &ProductId,
    gender: &str,
    article_type: &str,
) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    AttributeFilter::new(exclude_id, gender, article_type).apply(products)
}

/// Narrow to the color named in `query_text`; pass everything through when
/// the query names no color.
pub fn filter_by_color_keyword<'a, I>(products: I, query_text: &str) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    match ColorFilter::from_query(query_text) {
        Some(filter) => filter.apply(products),
        None => products.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector;

    fn garment(id: u64, gender: &str, article_type: &str, description: &str) -> Product {
        Product::new(id, Vector::new(vec![1.0, 0.0]), gender, article_type)
            .with_description(description)
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_attribute_filter_excludes_anchor_and_keeps_order() {
        let products = vec![
            garment(1, "Women", "Dresses", ""),
            garment(2, "Men", "Dresses", ""),
            garment(3, "Women", "Dresses", ""),
            garment(4, "Women", "Tops", ""),
            garment(5, "Women", "Dresses", ""),
        ];
        let anchor = &products[0];
        let strict =
            filter_by_attributes(&products, &anchor.id, &anchor.gender, &anchor.article_type);
        assert_eq!(ids(&strict), vec!["3", "5"]);
    }

    #[test]
    fn test_attribute_filter_is_case_sensitive() {
        let products = vec![
            garment(1, "women", "dresses", ""),
            garment(2, "Women", "Dresses", ""),
        ];
        let strict = filter_by_attributes(&products, &ProductId::Integer(99), "Women", "Dresses");
        assert_eq!(ids(&strict), vec!["2"]);
    }

    #[test]
    fn test_extract_color_uses_vocabulary_order() {
        assert_eq!(extract_color("Looking for a BLUE dress"), Some(Color::Blue));
        // red appears first in the text but blue comes first in the vocabulary
        assert_eq!(extract_color("red and blue stripes"), Some(Color::Blue));
        assert_eq!(extract_color("a charcoal jacket"), None);
        assert_eq!(extract_color(""), None);
    }

    #[test]
    fn test_extract_color_is_substring_match() {
        assert_eq!(extract_color("bluish tint"), Some(Color::Blue));
        assert_eq!(extract_color("Greyish"), Some(Color::Grey));
    }

    #[test]
    fn test_color_filter_keeps_matching_descriptions() {
        let products = vec![
            garment(1, "Women", "Dresses", "Color: Light Blue, Pattern: Solid"),
            garment(2, "Women", "Dresses", "Color: Red, Pattern: Floral"),
            garment(3, "Women", "Dresses", "Color: navy blue"),
        ];
        let filtered = filter_by_color_keyword(&products, "looking for a blue dress");
        assert_eq!(ids(&filtered), vec!["1", "3"]);
    }

    #[test]
    fn test_color_filter_uses_first_color_of_description() {
        let products = vec![
            garment(1, "Women", "Dresses", "blue with red trim"),
            garment(2, "Women", "Dresses", "red"),
        ];
        // Product 1 is attributed blue only, so a red query skips it
        let filtered = filter_by_color_keyword(&products, "red dress");
        assert_eq!(ids(&filtered), vec!["2"]);
    }

    #[test]
    fn test_color_filter_noop_without_color() {
        let products = vec![
            garment(1, "Women", "Dresses", "blue"),
            garment(2, "Men", "Shirts", "no color here"),
        ];
        let filtered = filter_by_color_keyword(&products, "formal shirt for office");
        assert_eq!(ids(&filtered), vec!["1", "2"]);
    }

    #[test]
    fn test_color_filter_can_empty_the_candidates() {
        let products = vec![garment(1, "Women", "Dresses", "black")];
        assert!(filter_by_color_keyword(&products, "pink top").is_empty());
    }

    #[test]
    fn test_color_serde() {
        assert_eq!(serde_json::to_string(&Color::Grey).unwrap(), "\"grey\"");
        assert_eq!(Color::Purple.to_string(), "purple");
    }
}
