use super::Credits;

/// Share of the pledge pool paid out on completion, as `NUMERATOR / DENOMINATOR`.
/// An equal amount is minted on top.
pub const MATCH_RATIO_NUMERATOR: i64 = 1;
pub const MATCH_RATIO_DENOMINATOR: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    from_pledge: Credits,
    minted_match: Credits,
}

impl Payout {
    /// `floor(pledged × ratio)` taken from the pool, matched by newly minted
    /// credits.
    pub fn for_pledged(pledged: Credits) -> Self {
        let from_pledge = Credits::parse(
            pledged.value_of() / MATCH_RATIO_DENOMINATOR * MATCH_RATIO_NUMERATOR
                + pledged.value_of() % MATCH_RATIO_DENOMINATOR
                    * MATCH_RATIO_NUMERATOR
                    / MATCH_RATIO_DENOMINATOR,
        )
        .unwrap_or(Credits::ZERO);

        Self {
            from_pledge,
            minted_match: from_pledge,
        }
    }

    pub fn from_pledge(&self) -> Credits {
        self.from_pledge
    }

    pub fn minted_match(&self) -> Credits {
        self.minted_match
    }

    /// Never overflows: the total is at most `pledged`.
    pub fn total(&self) -> Credits {
        self.from_pledge
            .checked_add(self.minted_match)
            .unwrap_or(self.from_pledge)
    }
}
