// Integration tests for Stylx
use async_trait::async_trait;
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use stylx::prelude::*;
use stylx::{filter_by_color_keyword, QueryOrigin};

/// Maps a handful of words onto fixed directions
struct VocabularyEmbedder;

#[async_trait]
impl TextEmbedder for VocabularyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        let text = text.to_lowercase();
        let weight = |word: &str| if text.contains(word) { 1.0 } else { 0.0 };
        Ok(Vector::new(vec![
            weight("dress"),
            weight("shirt"),
            weight("jeans"),
            0.05,
        ]))
    }

    fn name(&self) -> &str {
        "vocabulary"
    }
}

struct StaticDescriber(&'static str);

#[async_trait]
impl ImageDescriber for StaticDescriber {
    async fn describe(&self, _image: &ImageInput) -> Result<String> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &str {
        "static"
    }
}

fn write_catalog(dir: &std::path::Path) {
    let records = [
        (1, "Women", "Dresses", [1.0, 0.0, 0.0, 0.1], "Color: Blue, Pattern: Floral"),
        (2, "Women", "Dresses", [0.9, 0.1, 0.0, 0.1], "Color: Red, Pattern: Solid"),
        (3, "Women", "Dresses", [0.95, 0.0, 0.05, 0.1], "Color: Sky blue, Fit: A-line"),
        (4, "Men", "Shirts", [0.0, 1.0, 0.0, 0.1], "Color: White, Pattern: Striped"),
        (5, "Men", "Shirts", [0.1, 0.9, 0.0, 0.1], "Color: Blue, Pattern: Checked"),
        (6, "Men", "Jeans", [0.0, 0.1, 1.0, 0.1], "Color: Dark blue, Fit: Slim"),
        (7, "Women", "Jeans", [0.0, 0.0, 0.9, 0.3], "Color: Black, Fit: Skinny"),
    ];
    let lines: Vec<String> = records
        .iter()
        .map(|(id, gender, article_type, embedding, desc)| {
            serde_json::json!({
                "id": id,
                "embeddings": embedding,
                "gender": gender,
                "articleType": article_type,
                "name": format!("Item {id}"),
                "image_desc": desc,
                "myntra_product_url": format!("https://shop.example/{id}"),
            })
            .to_string()
        })
        .collect();
    fs::write(dir.join("part-0.jsonl"), lines[..4].join("\n")).unwrap();
    fs::write(dir.join("part-1.jsonl"), lines[4..].join("\n")).unwrap();
}

fn load_retriever(config: RetrieverConfig, description: &'static str) -> Retriever {
    let dir = tempfile::TempDir::new().unwrap();
    write_catalog(dir.path());
    let catalog = CatalogLoader::load(dir.path()).unwrap();
    Retriever::new(
        catalog,
        Arc::new(VocabularyEmbedder),
        Arc::new(StaticDescriber(description)),
        config,
    )
    .unwrap()
}

#[test]
fn test_catalog_loads_in_file_order() {
    let retriever = load_retriever(RetrieverConfig::default(), "");
    let ids: Vec<String> = retriever.catalog().iter().map(|p| p.id.to_string()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7"]);
    assert_eq!(retriever.catalog().dimension(), Some(4));
}

#[tokio::test]
async fn test_text_search_end_to_end() {
    let retriever = load_retriever(RetrieverConfig::default(), "");
    let outcome = retriever
        .retrieve(Query::Text("Looking for a BLUE dress".to_string()))
        .await
        .unwrap();

    assert_eq!(outcome.color, Some(Color::Blue));
    let anchors: Vec<String> = outcome
        .recommendations
        .iter()
        .map(|r| r.anchor.id_string())
        .collect();
    // Blue items only: dresses first, then the blue shirt and jeans
    assert_eq!(&anchors[..2], &["1".to_string(), "3".to_string()]);
    assert_eq!(anchors.len(), 4);

    for recommendation in &outcome.recommendations {
        let anchor = recommendation.anchor.product;
        let ids: HashSet<&ProductId> =
            recommendation.similar.iter().map(|s| &s.product.id).collect();
        assert_eq!(ids.len(), recommendation.similar.len());
        assert_eq!(recommendation.similar.len(), 5);

        let has_peers = retriever.catalog().iter().any(|p| {
            p.id != anchor.id && p.gender == anchor.gender && p.article_type == anchor.article_type
        });
        if has_peers {
            assert!(!ids.contains(&anchor.id));
        }
    }
}

#[tokio::test]
async fn test_image_search_end_to_end() {
    let retriever = load_retriever(
        RetrieverConfig {
            top_n: 1,
            similar_count: 3,
            ..RetrieverConfig::default()
        },
        "Gender: Men, Product Type: jeans, Color: Black, Fit: Slim",
    );
    let image = ImageInput::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg").unwrap();
    let outcome = retriever.retrieve(Query::Image(image)).await.unwrap();

    assert_eq!(outcome.origin, QueryOrigin::Image);
    // The description mentions black, but image queries are not color filtered
    assert_eq!(outcome.color, None);
    let recommendation = &outcome.recommendations[0];
    assert_eq!(recommendation.anchor.id_string(), "6");
    // Men's jeans have no other match, so the set falls back to the whole
    // catalog and includes the anchor itself
    let similar: Vec<String> = recommendation.similar.iter().map(|s| s.id_string()).collect();
    assert_eq!(similar[0], "6");
    assert_eq!(similar.len(), 3);
}

#[test]
fn test_similar_set_backfills_to_requested_size() {
    let retriever = load_retriever(RetrieverConfig::default(), "");
    let catalog = retriever.catalog();
    let anchor = catalog.get(&ProductId::Integer(4)).unwrap();

    let similar = build_similar_set(anchor, catalog, 4).unwrap();
    let ids: Vec<String> = similar.iter().map(|s| s.id_string()).collect();
    assert_eq!(ids.len(), 4);
    assert_eq!(ids[0], "5");
    assert!(!ids.contains(&"4".to_string()));
}

#[test]
fn test_color_filter_then_rank() {
    let retriever = load_retriever(RetrieverConfig::default(), "");
    let catalog = retriever.catalog();
    let blue = filter_by_color_keyword(catalog, "blue please");
    let ranked = rank(blue, &Vector::new(vec![0.0, 0.0, 1.0, 0.0]), 10).unwrap();
    let ids: Vec<String> = ranked.iter().map(|r| r.id_string()).collect();
    assert_eq!(ids[0], "6");
    assert_eq!(ids.len(), 4);
}
