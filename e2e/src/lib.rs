//! End-to-end scenarios against a mock OSM server.

#[cfg(test)]
mod tests;
