use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDoc {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub offer_price: Option<f64>,
    pub images: Vec<String>,
    pub category: String,
    pub description: String,
    pub stock: u32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProductDoc {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub offer_price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub stock: Option<u32>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdatesDoc {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub offer_price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub stock: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct UpdateRequestDoc { pub id: String, pub updates: ProductUpdatesDoc }

#[derive(Serialize, ToSchema)]
pub struct DeleteRequestDoc { pub id: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::products::list,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ProductDoc,
            NewProductDoc,
            ProductUpdatesDoc,
            UpdateRequestDoc,
            DeleteRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "catalog")
    )
)]
pub struct ApiDoc;
