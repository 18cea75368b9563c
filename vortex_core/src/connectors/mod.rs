// Upstream catalog families, one feature each

#[cfg(feature = "apple-cms")]
pub mod apple_cms;
#[cfg(feature = "bangumi")]
pub mod bangumi;

/// Client families compiled into this build, for diagnostics.
pub fn enabled_families() -> Vec<&'static str> {
    #[allow(unused_mut)]
    let mut families = Vec::new();
    #[cfg(feature = "apple-cms")]
    families.push("apple_cms");
    #[cfg(feature = "bangumi")]
    families.push("bangumi");
    families
}
