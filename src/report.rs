//! Plain-text breakdown of an allocation, as offered for download.

use std::fmt::{self, Write};

use crate::engine::Allocation;

/// Render the breakdown as a string.
pub fn breakdown(allocation: &Allocation) -> String {
    let mut out = String::new();
    // writing into a String never fails
    let _ = write_breakdown(allocation, &mut out);
    out
}

/// Write the breakdown into `out`.
///
/// Every amount is shown with exactly two decimals. Participants appear in
/// input order, each block followed by a blank line.
pub fn write_breakdown(allocation: &Allocation, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "Subtotal: ${}", allocation.subtotal())?;
    writeln!(out, "Taxes & Tips: ${}", allocation.surcharge())?;
    writeln!(out, "Grand Total: ${}", allocation.grand_total())?;
    writeln!(out)?;
    writeln!(out, "Amount Each Person Owes:")?;

    for share in allocation.participants() {
        writeln!(out, "{}:", share.name())?;
        for item in share.items() {
            writeln!(out, "    - {}: ${}", item.description, item.amount)?;
        }
        writeln!(out, "Taxes & Tips: ${}", share.surcharge())?;
        writeln!(out, "Total Cost: ${}", share.owed())?;
        writeln!(out)?;
    }

    Ok(())
}
