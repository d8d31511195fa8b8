//! Basic usage examples for KeyedPool

use keyedpool::{KeyedPool, PoolConfiguration};

fn main() {
    println!("=== EsoxSolutions.KeyedPool - Basic Examples ===\n");

    // Example 1: Simple keyed pool
    simple_pool();

    // Example 2: Pool with configuration
    configured_pool();

    // Example 3: Purging
    purging();

    // Example 4: Metrics and health
    metrics_and_health();
}

fn simple_pool() {
    println!("1. Simple Pool:");
    let pool: KeyedPool<String, Vec<u8>> = KeyedPool::new(
        |_key, _handle| Ok::<_, std::convert::Infallible>(vec![0u8; 1024]),
        PoolConfiguration::default(),
    );

    let key = "buffers".to_string();
    {
        let buffer = pool.acquire(&key).unwrap();
        println!("   Got buffer of {} bytes", buffer.len());
        // Resource automatically returned when dropped
    }

    println!("   Idle after return: {}\n", pool.idle_count(&key));
}

fn configured_pool() {
    println!("2. Configured Pool:");

    let config = PoolConfiguration::new()
        .with_max_idle(2)
        .with_validator(|v: &i32| *v > 0);

    let pool: KeyedPool<String, i32> = KeyedPool::new(
        |_key, _handle| Ok::<_, std::convert::Infallible>(1),
        config,
    );

    let key = "counters".to_string();
    let a = pool.acquire(&key).unwrap();
    let b = pool.acquire(&key).unwrap();
    let c = pool.acquire(&key).unwrap();
    drop(a);
    drop(b);
    drop(c); // third release exceeds max_idle and is destroyed

    println!("   Idle after three releases (max_idle = 2): {}\n", pool.idle_count(&key));
}

fn purging() {
    println!("3. Purging:");
    let pool: KeyedPool<String, i32> = KeyedPool::new(
        |_key, _handle| Ok::<_, std::convert::Infallible>(7),
        PoolConfiguration::default(),
    );

    for name in ["alpha", "beta"] {
        let key = name.to_string();
        let resource = pool.acquire(&key).unwrap();
        drop(resource);
    }
    println!("   Known keys: {}", pool.key_count());

    pool.purge(&"alpha".to_string());
    println!("   After purge(alpha) - has alpha: {}", pool.has(&"alpha".to_string()));

    pool.purge_all();
    println!("   After purge_all - known keys: {}\n", pool.key_count());
}

fn metrics_and_health() {
    println!("4. Metrics and Health:");
    let pool: KeyedPool<String, i32> = KeyedPool::new(
        |_key, _handle| Ok::<_, std::convert::Infallible>(7),
        PoolConfiguration::default(),
    );

    let key = "alpha".to_string();
    for _ in 0..3 {
        let resource = pool.acquire(&key).unwrap();
        drop(resource);
    }

    let health = pool.get_health_status();
    println!("   Health: {}", if health.is_healthy() { "Healthy" } else { "Unhealthy" });
    println!("   Reuse ratio: {:.1}%", health.reuse_ratio * 100.0);
    println!("   Idle: {}, Keys: {}", health.idle_resources, health.known_keys);

    let metrics = pool.export_metrics();
    println!("\n   Metrics:");
    for (key, value) in metrics {
        println!("     {}: {}", key, value);
    }
}
