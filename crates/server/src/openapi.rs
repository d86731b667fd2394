use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Wire shape of a product; `id` is ignored on create.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProductDoc {
    #[schema(example = 123456)]
    pub id: i32,
    #[schema(max_length = 100, example = "Desk Lamp")]
    pub name: String,
    #[schema(max_length = 500)]
    pub description: Option<String>,
    #[schema(example = 19.99)]
    pub price: f64,
    #[schema(minimum = 1, example = 10)]
    pub stock_available: i32,
}

#[derive(ToSchema)]
pub struct ApiErrorDoc {
    pub title: String,
    pub status: u16,
    pub detail: Option<String>,
    /// Field name -> messages, present on validation failures.
    pub errors: Option<std::collections::HashMap<String, Vec<String>>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::products::decrement_stock,
        crate::routes::products::add_to_stock,
    ),
    components(
        schemas(
            HealthResponse,
            ProductDoc,
            ApiErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "products")
    )
)]
pub struct ApiDoc;
