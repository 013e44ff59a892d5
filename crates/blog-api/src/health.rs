/// Liveness probe. Routed for GET, which axum also answers for HEAD.
pub async fn healthz() -> &'static str {
    "OK"
}
