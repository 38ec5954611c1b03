//! OpenAPI specification for the Elevora server.

use utoipa::OpenApi;

use elevora_core::{
    AuditDocument, AuditRequest, AuditView, BarPoint, CategoryIssueCount, CategoryScore,
    ElementIssues, ExplainedRecommendation, Grade, LinePoint, PageScore, PieSlice,
    RecommendationEntry, TimeSeriesSample, TrendSummary,
};

use crate::routes::{
    ErrorResponse, IssuesResponse, SelectCategoryRequest, SelectionResponse, ViewResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::run_audit,
        crate::routes::load_view,
        crate::routes::current_view,
        crate::routes::select_category,
        crate::routes::active_issues,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            AuditRequest,
            AuditDocument,
            CategoryScore,
            PageScore,
            TimeSeriesSample,
            RecommendationEntry,
            AuditView,
            Grade,
            PieSlice,
            BarPoint,
            LinePoint,
            TrendSummary,
            CategoryIssueCount,
            ElementIssues,
            ExplainedRecommendation,
            ViewResponse,
            SelectCategoryRequest,
            SelectionResponse,
            IssuesResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "audit", description = "Audit documents and dashboard views"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the Elevora server.
pub struct ApiDoc;
