use clap::Parser;
use lp_hash::HashTable;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Parser, Debug)]
struct Args {
    /// Number of keys to insert
    #[arg(short = 'n', long = "keys", default_value_t = 1000)]
    keys: usize,

    /// Insert random keys instead of 1..=keys
    #[arg(short = 'r', long = "random")]
    random: bool,

    /// Percentage of keys to delete before compacting
    #[arg(short = 'd', long = "delete_percent", default_value_t = 75)]
    delete_percent: u8,
}

fn report(table: &HashTable<u64, u64>) {
    table.probe_histogram().print();
    table.debug_stats().print();
    println!();
}

fn main() {
    let args = Args::parse();
    let mut rng = SmallRng::from_os_rng();

    let keys = (1..=args.keys as u64)
        .map(|key| if args.random { rng.random() } else { key })
        .collect::<Vec<u64>>();

    let mut table: HashTable<u64, u64> = HashTable::new();
    for &key in &keys {
        let handle = table.insert(key);
        *table.value_mut(handle) = key;
    }

    println!(
        "Inserted {} keys, capacity {} cells",
        table.len(),
        table.capacity()
    );
    report(&table);

    let doomed = keys.len() * usize::from(args.delete_percent.min(100)) / 100;
    for &key in &keys[..doomed] {
        table.delete_key(key);
    }
    println!("Deleted {doomed} keys");
    report(&table);

    table.compact();
    println!("Compacted to {} cells", table.capacity());
    report(&table);
}
