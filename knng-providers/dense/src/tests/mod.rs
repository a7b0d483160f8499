mod errors;
mod ingest;
mod support;
