/// Player columns an action may write back on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Tokens,
    Points,
    Savings,
    Liabilities,
    Assets,
}
