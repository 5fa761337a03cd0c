//! The position table printed after every step of a scenario

use alloy::primitives::{Address, U256};
use eyre::Result;
use itertools::Itertools;
use scripts::utils::format_amount_rounded;

use crate::{
    test_inventory::{Actor, TestArgs},
    util::fixture::Fixture,
};

/// The column headers of the table
const HEADERS: [&str; 4] = ["name", "tokenA", "tokenB", "tokenP"];

/// One holder's balances of the two tokens and the liquidity token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// The holder's name
    pub name: String,
    /// The `token_a` balance
    pub token_a: U256,
    /// The `token_b` balance
    pub token_b: U256,
    /// The liquidity token balance
    pub token_p: U256,
}

impl Position {
    /// The column-wise sum of the given positions
    pub fn total(positions: &[Position]) -> Self {
        positions.iter().fold(
            Position {
                name: "total".to_string(),
                token_a: U256::ZERO,
                token_b: U256::ZERO,
                token_p: U256::ZERO,
            },
            |total, p| Position {
                token_a: total.token_a + p.token_a,
                token_b: total.token_b + p.token_b,
                token_p: total.token_p + p.token_p,
                ..total
            },
        )
    }

    /// The table cells for this position
    fn cells(&self) -> [String; 4] {
        [
            self.name.clone(),
            format_amount_rounded(self.token_a),
            format_amount_rounded(self.token_b),
            format_amount_rounded(self.token_p),
        ]
    }
}

/// The holders reported in the table, in row order
pub fn holders(args: &TestArgs, fixture: &Fixture) -> Vec<(String, Address)> {
    let actors: [&Actor; 4] = [&args.lisa, &args.lily, &args.tim, &args.fee_to];
    actors
        .iter()
        .map(|actor| (actor.name.to_string(), actor.address))
        .chain([("pair".to_string(), fixture.pair)])
        .collect()
}

/// Fetch the position of every holder, followed by the total
pub async fn fetch_positions(args: &TestArgs, fixture: &Fixture) -> Result<Vec<Position>> {
    let mut positions = Vec::new();
    for (name, address) in holders(args, fixture) {
        let (token_a, token_b, token_p) = fixture.balances(&args.wallet, address).await?;
        positions.push(Position {
            name,
            token_a,
            token_b,
            token_p,
        });
    }

    positions.push(Position::total(&positions));
    Ok(positions)
}

/// Fetch and print the position table
pub async fn log_positions(args: &TestArgs, fixture: &Fixture) -> Result<Vec<Position>> {
    let positions = fetch_positions(args, fixture).await?;
    println!("{}", render_table(&positions));
    Ok(positions)
}

/// Render positions as an aligned text table, names left aligned and
/// amounts right aligned
pub fn render_table(positions: &[Position]) -> String {
    let header = HEADERS.map(str::to_string);
    let rows: Vec<[String; 4]> = positions.iter().map(Position::cells).collect();

    let mut widths = header.clone().map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let render_row = |row: &[String; 4]| {
        row.iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .join(" | ")
    };
    let separator = widths.iter().map(|w| "-".repeat(*w)).join("-+-");

    [render_row(&header), separator]
        .into_iter()
        .chain(rows.iter().map(render_row))
        .join("\n")
}
