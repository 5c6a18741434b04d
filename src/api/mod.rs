// =============================================================================
// HTTP Surface
// =============================================================================
//
// Thin I/O glue over the analysis engine: routing, CORS, request tracing and
// the error-to-status mapping. No indicator math lives here.

pub mod routes;
