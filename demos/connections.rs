//! Advanced features: self-returning resources, validation, purge semantics

use keyedpool::{KeyedPool, PoolConfiguration, ReleaseHandle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A fake network connection whose close path hands it back to the pool.
struct Connection {
    id: usize,
    addr: String,
    alive: bool,
    handle: ReleaseHandle<String, Connection>,
}

impl Connection {
    /// Park the connection back in the pool instead of closing it.
    fn park(self) {
        let handle = self.handle.clone();
        let key = self.addr.clone();
        handle.release(&key, self);
    }
}

fn main() {
    println!("=== EsoxSolutions.KeyedPool - Advanced Features ===\n");

    let next_id = Arc::new(AtomicUsize::new(0));
    let config = PoolConfiguration::new()
        .with_max_idle(8)
        .with_validator(|conn: &Connection| conn.alive)
        .with_destroyer(|conn: Connection| {
            println!("   [destroyer] closing connection #{} to {}", conn.id, conn.addr);
        });

    let pool: KeyedPool<String, Connection> = KeyedPool::new(
        move |addr: &String, handle| {
            let id = next_id.fetch_add(1, Ordering::SeqCst);
            println!("   [factory] dialing {} (connection #{})", addr, id);
            Ok::<_, std::convert::Infallible>(Connection {
                id,
                addr: addr.clone(),
                alive: true,
                handle,
            })
        },
        config,
    );

    self_return(&pool);
    validation(&pool);
    purge_while_borrowed(&pool);
    prometheus(&pool);
}

fn self_return(pool: &KeyedPool<String, Connection>) {
    println!("1. Self-Returning Resources:");
    let key = "db.internal:5432".to_string();

    // Detach from the guard and let the connection park itself.
    let conn = pool.acquire(&key).unwrap().into_inner();
    println!("   Using connection #{}", conn.id);
    conn.park();

    println!("   Idle for {}: {}\n", key, pool.idle_count(&key));
}

fn validation(pool: &KeyedPool<String, Connection>) {
    println!("2. Validation:");
    let key = "db.internal:5432".to_string();

    let mut conn = pool.acquire(&key).unwrap();
    println!("   Reusing connection #{}", conn.id);
    conn.alive = false; // simulate a broken connection
    drop(conn); // fails validation on release and is destroyed

    println!("   Idle after releasing a dead connection: {}\n", pool.idle_count(&key));
}

fn purge_while_borrowed(pool: &KeyedPool<String, Connection>) {
    println!("3. Purge While Borrowed:");
    let key = "cache.internal:6379".to_string();

    let borrowed = pool.acquire(&key).unwrap();
    let spare = pool.acquire(&key).unwrap();
    drop(spare);

    pool.purge(&key);
    println!("   Key known after purge: {}", pool.has(&key));

    // The borrowed connection finds its key gone and is destroyed on release.
    drop(borrowed);
    println!("   Key known after late release: {}\n", pool.has(&key));
}

fn prometheus(pool: &KeyedPool<String, Connection>) {
    println!("4. Prometheus Export:");

    let mut tags = HashMap::new();
    tags.insert("service".to_string(), "demo".to_string());

    let output = pool.export_metrics_prometheus("connections", Some(&tags));
    println!("{}", output);
}
