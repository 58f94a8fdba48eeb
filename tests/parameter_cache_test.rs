// Integration tests for pooled parameter caches

use urimatch::{ParameterCache, ParameterError, ParameterPool, RangeParameterCache};

mod common;

#[test]
fn test_copying_cache_outlives_candidate() {
    let pool = ParameterPool::new(8);
    let t = common::template("/baz/{bar}/blob");
    let mut cache = ParameterCache::rent_from(&pool, 2);

    {
        let uri = String::from("/baz/fod/blob");
        assert_eq!(cache.capture(&t, &uri), Ok(true));
    }

    assert_eq!(cache.get("bar"), Ok("fod"));
    let mut seen = Vec::new();
    cache.enumerate(|name, value| seen.push(format!("{}={}", name, value))).unwrap();
    assert_eq!(seen, vec!["bar=fod"]);
}

#[test]
fn test_backtracking_leaves_only_final_attempt() {
    let pool = ParameterPool::new(8);
    let t = common::template("/{a}/{b}/end");
    let mut cache = ParameterCache::rent_from(&pool, 1);

    assert_eq!(cache.capture(&t, "/x/y/z/end"), Ok(true));
    let captured: Vec<(&str, &str)> = cache.iter().collect();
    assert_eq!(captured, vec![("a", "y"), ("b", "z")]);
}

fn pool_counts(pool: &ParameterPool) -> (usize, usize, usize) {
    let stats = pool.stats();
    (stats.entry_buffers, stats.text_buffers, stats.range_buffers)
}

#[test]
fn test_copying_cache_returns_grown_buffers() {
    let pool = ParameterPool::new(8);
    let t = common::template("/{a}/{b}");

    {
        let mut cache = ParameterCache::rent_from(&pool, 1);
        assert_eq!(cache.capture(&t, "/1/2"), Ok(true));
        // The outgrown one-slot entry array is already parked
        assert_eq!(pool_counts(&pool), (1, 0, 0));
    }
    assert_eq!(pool_counts(&pool), (2, 2, 0));

    // A second rental reuses what was parked instead of adding more
    {
        let mut cache = ParameterCache::rent_from(&pool, 1);
        assert_eq!(cache.capture(&t, "/3/4"), Ok(true));
        assert_eq!(cache.get("b"), Ok("4"));
    }
    assert_eq!(pool_counts(&pool), (2, 2, 0));
}

#[test]
fn test_copying_cache_returns_buffers_after_failed_match() {
    let pool = ParameterPool::new(8);
    let t = common::template("/{a}/{b}");

    {
        let mut cache = ParameterCache::rent_from(&pool, 1);
        assert_eq!(cache.capture(&t, "/x"), Ok(false));
        assert!(cache.is_empty());
    }
    assert_eq!(pool_counts(&pool), (1, 1, 0));
}

#[test]
fn test_copying_cache_returns_buffers_for_empty_candidate() {
    let pool = ParameterPool::new(8);
    let t = common::template("/{a}/{b}");

    {
        let mut cache = ParameterCache::rent_from(&pool, 1);
        assert_eq!(cache.capture(&t, ""), Ok(false));
    }
    assert_eq!(pool_counts(&pool), (1, 0, 0));
}

#[test]
fn test_range_cache_returns_grown_buffers() {
    let pool = ParameterPool::new(8);
    let t = common::template("/{a}/{b}");

    {
        let mut cache = RangeParameterCache::rent_from(&pool, 1);
        assert_eq!(cache.capture(&t, "/1/2"), Ok(true));
        assert_eq!(cache.len(), 2);
        assert_eq!(pool_counts(&pool), (0, 0, 1));
    }
    assert_eq!(pool_counts(&pool), (0, 0, 2));

    {
        let mut cache = RangeParameterCache::rent_from(&pool, 1);
        assert_eq!(cache.capture(&t, "/no"), Ok(false));
    }
    assert_eq!(pool_counts(&pool), (0, 0, 2));
}

#[test]
fn test_released_cache_reports_misuse() {
    let pool = ParameterPool::new(8);
    let t = common::template("/{a}");
    let mut cache = RangeParameterCache::rent_from(&pool, 4);
    assert_eq!(cache.capture(&t, "/1"), Ok(true));

    cache.release();
    assert!(cache.is_released());
    assert!(cache.is_empty());
    assert_eq!(cache.get(&t, "a"), Err(ParameterError::Released));
    assert_eq!(cache.capture(&t, "/1"), Err(ParameterError::Released));
}

#[test]
fn test_missing_parameter_is_an_error() {
    let t = common::template("/foo{?x,y}");
    let mut cache = ParameterCache::rent(4);
    assert_eq!(cache.capture(&t, "/foo?x=1"), Ok(true));

    assert_eq!(cache.get("x"), Ok("1"));
    assert_eq!(cache.get("y"), Err(ParameterError::Missing("y".to_string())));
    assert_eq!(cache.try_get("y"), None);
}
