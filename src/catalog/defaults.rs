use super::*;
use crate::ID;

/// Stable ids so clients can reference built-in content across restarts.
fn fixed<T>(n: u128) -> ID<T> {
    ID::from(uuid::Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0000 | n))
}

impl Contents {
    /// Content shipped with the server when no catalog file is given.
    pub fn builtin() -> Self {
        let laptop = fixed(0x401);
        Self {
            users: None,
            assets: vec![
                Asset::new("a1", "Campus Printing Shop", 320),
                Asset::new("a2", "Online Tasking Platform", 220),
                Asset::new("a3", "Monetized YouTube Channel", 170),
                Asset::new("a4", "Peer to Peer Lending Fund", 220),
                Asset::new("a5", "Cryptocurrency Portfolio", 240),
            ],
            events: vec![
                EventCard::new(fixed(0x101), "Scholarship", "Your grades paid off.", 150),
                EventCard::new(fixed(0x102), "Side Gig", "A weekend of freelance work.", 100),
                EventCard::new(fixed(0x103), "Phone Repair", "Cracked screen again.", -80),
                EventCard::new(fixed(0x104), "Medical Bill", "An unexpected clinic visit.", -120),
                EventCard::new(fixed(0x105), "Birthday Gift", "Family sends their love.", 50),
            ],
            savings: vec![
                SavingsCard::new(
                    fixed(0x201),
                    "Emergency Fund",
                    100,
                    Some(Bonus::FlatBonus { bonus: 20 }),
                ),
                SavingsCard::new(
                    fixed(0x202),
                    "Reinvest Profits",
                    200,
                    Some(Bonus::IfOwnsAsset { bonus: 50 }),
                ),
                SavingsCard::new(fixed(0x203), "Piggy Bank", 0, None),
            ],
            spending: vec![
                SpendingCard::new(fixed(0x301), "Concert Tickets", 60),
                SpendingCard::new(fixed(0x302), "New Sneakers", 90),
                SpendingCard::new(fixed(0x303), "Weekend Trip", 150),
            ],
            dreams: vec![
                Dream::new(laptop, "Laptop", "laptop", 500, 1, None),
                Dream::new(fixed(0x402), "Car", "car", 1000, 2, Some(laptop)),
                Dream::new(fixed(0x403), "House", "house", 2000, 3, Some(fixed(0x402))),
            ],
        }
    }
}
