// EsoxSolutions.KeyedPool
// Thread-safe keyed resource pool

// This is just a binary wrapper - the actual library is in lib.rs
// Run examples with: cargo run --example basic

use keyedpool::{KeyedPool, PoolConfiguration};

fn main() {
    println!("=== EsoxSolutions.KeyedPool ===");
    println!("See demos/ directory for usage examples");
    println!("Run: cargo run --example basic");
    println!();

    // Quick demo
    println!("Quick Demo:");
    let pool: KeyedPool<String, String> = KeyedPool::new(
        |key, _handle| Ok::<_, std::convert::Infallible>(format!("session for {key}")),
        PoolConfiguration::default(),
    );

    let key = "api.example.com:443".to_string();
    {
        let session = pool.acquire(&key).unwrap();
        println!("  Got resource: {}", *session);
    }

    println!("  Idle for key after return: {}", pool.idle_count(&key));
}
