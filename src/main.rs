use blockdeque::Deque;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG=blockdeque=trace` shows every split, grow and merge.
fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn print_layout(label: &str, deque: &Deque<u64>) {
    let sizes: Vec<usize> = deque.block_sizes().iter().map(|&(size, _)| size).collect();
    tracing::info!(
        "{label}: len={} blocks={} ideal={} sizes={:?}",
        deque.len(),
        deque.block_count(),
        deque.ideal_capacity(),
        sizes
    );
}

fn main() -> blockdeque::Result<()> {
    enable_tracing();

    let mut deque: Deque<u64> = (0..10_000).collect();
    print_layout("after 10k pushes", &deque);

    let mut cursor = deque.cursor_at(5_000)?;
    for i in 0..2_000 {
        cursor = deque.insert(cursor, 1_000_000 + i)?;
    }
    print_layout("after 2k middle inserts", &deque);

    let mut cursor = deque.begin();
    while !cursor.is_end() {
        cursor = if deque.get_at(&cursor)? % 3 == 0 {
            deque.erase(cursor)?
        } else {
            deque.next_cursor(cursor)?
        };
    }
    print_layout("after erasing multiples of 3", &deque);

    while deque.len() > 100 {
        deque.pop_front()?;
    }
    print_layout("after draining the front", &deque);
    Ok(())
}
