use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer, ResponseError, Result as ActixResult};
use bytes::BytesMut;
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stylx_core::{Color, Error, ProductId};
use stylx_similarity::{ImageInput, Query, QueryOrigin, RankedResult, RetrievalOutcome, Retriever};
use tracing::error;

/// Largest accepted image upload
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    products: usize,
    dimension: Option<usize>,
}

#[derive(Serialize)]
struct ProductView<'a> {
    id: &'a ProductId,
    name: &'a str,
    gender: &'a str,
    article_type: &'a str,
    description: &'a str,
    image_ref: &'a str,
    purchase_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    brand: Option<&'a str>,
    score: f32,
}

impl<'a> From<&RankedResult<'a>> for ProductView<'a> {
    fn from(result: &RankedResult<'a>) -> Self {
        let product = result.product;
        Self {
            id: &product.id,
            name: &product.name,
            gender: &product.gender,
            article_type: &product.article_type,
            description: &product.description,
            image_ref: &product.image_ref,
            purchase_url: &product.purchase_url,
            brand: product.brand.as_deref(),
            score: result.score,
        }
    }
}

#[derive(Serialize)]
struct RecommendationView<'a> {
    product: ProductView<'a>,
    similar: Vec<ProductView<'a>>,
}

#[derive(Serialize)]
struct SearchResponse<'a> {
    origin: QueryOrigin,
    query_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
    results: Vec<RecommendationView<'a>>,
}

impl<'a> From<&'a RetrievalOutcome<'a>> for SearchResponse<'a> {
    fn from(outcome: &'a RetrievalOutcome<'a>) -> Self {
        Self {
            origin: outcome.origin,
            query_text: &outcome.query_text,
            color: outcome.color,
            results: outcome
                .recommendations
                .iter()
                .map(|r| RecommendationView {
                    product: ProductView::from(&r.anchor),
                    similar: r.similar.iter().map(ProductView::from).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

/// Errors surfaced by the HTTP layer
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Retrieval(#[from] Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Retrieval(Error::EmbeddingUnavailable(_)) => "embedding_unavailable",
            ApiError::Retrieval(Error::AttributeExtractionEmpty) => "image_unreadable",
            ApiError::Retrieval(Error::ProductNotFound(_)) => "not_found",
            ApiError::Retrieval(Error::InvalidQuery(_)) | ApiError::BadRequest(_) => "bad_request",
            ApiError::Retrieval(_) => "internal",
        }
    }

    fn user_message(&self) -> String {
        match self {
            ApiError::Retrieval(Error::EmbeddingUnavailable(_)) => {
                "Our search service is taking a break. Give it a minute and try again.".to_string()
            }
            ApiError::Retrieval(Error::AttributeExtractionEmpty) => {
                "We couldn't read that image. Try again later or upload a different photo."
                    .to_string()
            }
            ApiError::Retrieval(Error::ProductNotFound(id)) => format!("No product with id {id}"),
            ApiError::Retrieval(Error::InvalidQuery(msg)) | ApiError::BadRequest(msg) => {
                msg.clone()
            }
            ApiError::Retrieval(_) => "Something went wrong on our side.".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Retrieval(Error::EmbeddingUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Retrieval(Error::AttributeExtractionEmpty) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Retrieval(Error::ProductNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Retrieval(Error::InvalidQuery(_)) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Retrieval(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        HttpResponse::build(status).json(ErrorBody {
            error: self.code(),
            message: self.user_message(),
        })
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(retriever: Arc<Retriever>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(retriever.clone()))
                .configure(Self::routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Register every route; the app must carry `web::Data<Arc<Retriever>>`
    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/health", web::get().to(health))
            .route("/catalog/stats", web::get().to(catalog_stats))
            .route("/search", web::post().to(search_text))
            .route("/search/image", web::post().to(search_image))
            .route("/products/{id}/similar", web::get().to(similar_products));
    }
}

async fn health(retriever: web::Data<Arc<Retriever>>) -> ActixResult<HttpResponse> {
    let catalog = retriever.catalog();
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        products: catalog.len(),
        dimension: catalog.dimension(),
    }))
}

async fn catalog_stats(retriever: web::Data<Arc<Retriever>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(retriever.catalog().stats()))
}

async fn search_text(
    retriever: web::Data<Arc<Retriever>>,
    req: web::Json<SearchRequest>,
) -> Result<HttpResponse, ApiError> {
    let outcome = retriever
        .retrieve(Query::Text(req.into_inner().query))
        .await?;
    Ok(HttpResponse::Ok().json(SearchResponse::from(&outcome)))
}

async fn search_image(
    retriever: web::Data<Arc<Retriever>>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let image = read_image_field(&mut payload).await?;
    let outcome = retriever.retrieve(Query::Image(image)).await?;
    Ok(HttpResponse::Ok().json(SearchResponse::from(&outcome)))
}

async fn similar_products(
    retriever: web::Data<Arc<Retriever>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let similar = retriever.similar_to(&path.into_inner())?;
    let views: Vec<ProductView<'_>> = similar.iter().map(ProductView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

/// Pull the `image` field out of a multipart upload
async fn read_image_field(payload: &mut Multipart) -> Result<ImageInput, ApiError> {
    let bad_request = |e: actix_multipart::MultipartError| ApiError::BadRequest(e.to_string());

    while let Some(mut field) = payload.try_next().await.map_err(bad_request)? {
        if field.name() != Some("image") {
            while field.try_next().await.map_err(bad_request)?.is_some() {}
            continue;
        }

        let mime_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field.try_next().await.map_err(bad_request)? {
            if buffer.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(ApiError::BadRequest(format!(
                    "image exceeds {} bytes",
                    MAX_IMAGE_BYTES
                )));
            }
            buffer.extend_from_slice(&chunk);
        }

        return Ok(ImageInput::new(buffer.freeze(), &mime_type)?);
    }

    Err(ApiError::BadRequest(
        "multipart field `image` is required".to_string(),
    ))
}
