/// Wraps a catalog lookup in a cache check.
///
/// On a hit the cached value is returned and the block never runs. On a
/// miss the block computes the value, which is queued for the write-behind
/// task and returned. The key expression is evaluated twice (read and
/// write), so it must be a binding or otherwise cheap to re-evaluate.
///
/// # Arguments
/// * `$cache`: a [`Cache`](super::Cache) handle.
/// * `$key`: the [`CacheKey`](super::CacheKey) for the value.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: async block producing the value on a miss.
///
/// # Example
/// ```rust,ignore
/// let genres = cached!(self.cache, cache_key, 3600, async move {
///     self.fetch_genres(kind).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
