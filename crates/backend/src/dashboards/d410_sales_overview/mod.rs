pub mod category;
pub mod metrics;
pub mod regional;
pub mod regionalizer;
pub mod service;
pub mod year_filter;

#[cfg(test)]
pub(crate) mod test_support;
