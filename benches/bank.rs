use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use bank_sim::{Account, AccountId, Amount, Bank, Transaction};

/// Generates transfers between the accounts of a bank, round robin.
///
/// Pattern per step (repeating):
/// 1. FlatAmount 10 with fee 1
/// 2. FlatPercent 25 at 2%
/// 3. FlatAmount larger than any balance (rejected)
pub struct TransferGenerator {
    ids: Vec<AccountId>,
    remaining: usize,
    step: usize,
}

impl TransferGenerator {
    /// Empty when the bank has no accounts.
    pub fn new(bank: &Bank, count: usize) -> Self {
        let ids: Vec<AccountId> = bank.accounts().iter().map(Account::id).collect();
        let remaining = if ids.is_empty() { 0 } else { count };
        Self {
            ids,
            remaining,
            step: 0,
        }
    }
}

impl Iterator for TransferGenerator {
    type Item = Transaction;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let from = self.ids[self.step % self.ids.len()];
        let to = self.ids[(self.step + 1) % self.ids.len()];
        let tx = match self.step % 3 {
            0 => Transaction::flat_amount(from, to, Amount::from_units(10), Amount::from_units(1)),
            1 => Transaction::flat_percent(from, to, Amount::from_units(25), 2),
            _ => Transaction::flat_amount(
                from,
                to,
                Amount::from_units(1_000_000_000),
                Amount::from_units(1),
            ),
        };
        self.step += 1;

        Some(tx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for TransferGenerator {}

fn bank_with(accounts: usize) -> Bank {
    Bank::new(
        "Bench",
        (0..accounts).map(|i| Account::new(format!("holder {i}"), Amount::from_units(1_000_000))),
    )
}

fn bench_transfers(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfers");

    for count in [10_000usize, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut bank = bank_with(10);
                let generator = TransferGenerator::new(&bank, count);
                for tx in generator {
                    let _ = black_box(bank.make_transaction(&tx));
                }
                bank
            });
        });
    }

    group.finish();
}

fn bench_account_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("account_lookup");

    // lookup is a linear scan, so cost grows with the bank size
    // an empty bank yields no transfers at all
    for accounts in [0usize, 10, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(accounts),
            &accounts,
            |b, &accounts| {
                b.iter(|| {
                    let mut bank = bank_with(accounts);
                    let generator = TransferGenerator::new(&bank, 10_000);
                    for tx in generator {
                        let _ = black_box(bank.make_transaction(&tx));
                    }
                    bank
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_transfers, bench_account_lookup);
criterion_main!(benches);
