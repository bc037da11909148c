//! Item stacks: a quantity of one item type sharing one durability value.

use super::ItemId;

/// A quantity of one item type sharing a single durability value.
///
/// A stack physically present in a slot always has `quantity > 0`; containers
/// drop the slot instead of keeping a zero stack around. `durability` carries
/// no meaning for items whose durability policy is `None`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub item: ItemId,
    pub quantity: u32,
    pub durability: f32,
}

impl ItemStack {
    pub fn new(item: impl Into<ItemId>, quantity: u32, durability: f32) -> Self {
        Self {
            item: item.into(),
            quantity,
            durability,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    /// Folds `quantity` units carrying `durability` into this stack.
    ///
    /// The resulting durability is the quantity-weighted average of both sides.
    pub fn absorb(&mut self, quantity: u32, durability: f32) {
        self.durability = weighted_durability(self.quantity, self.durability, quantity, durability);
        self.quantity = self.quantity.saturating_add(quantity);
    }

    /// Splits `quantity` units off this stack, keeping the same durability.
    ///
    /// Returns `None` when the split would empty the stack or take nothing.
    pub fn split_off(&mut self, quantity: u32) -> Option<ItemStack> {
        if quantity == 0 || quantity >= self.quantity {
            return None;
        }
        self.quantity -= quantity;
        Some(ItemStack::new(self.item.clone(), quantity, self.durability))
    }
}

/// Quantity-weighted durability average: `(d_old*q_old + d_new*q_new) / (q_old+q_new)`.
///
/// Computed in `f64` so that exactly representable inputs give exact results.
pub fn weighted_durability(q_old: u32, d_old: f32, q_new: u32, d_new: f32) -> f32 {
    let total = u64::from(q_old) + u64::from(q_new);
    if total == 0 {
        return d_old;
    }
    let weighted = f64::from(d_old) * f64::from(q_old) + f64::from(d_new) * f64::from(q_new);
    (weighted / total as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_averages_by_quantity() {
        let mut stack = ItemStack::new("berry", 5, 10.0);
        stack.absorb(5, 20.0);
        assert_eq!(stack.quantity, 10);
        assert_eq!(stack.durability, 15.0);
    }

    #[test]
    fn absorb_weights_uneven_quantities() {
        let mut stack = ItemStack::new("berry", 3, 4.0);
        stack.absorb(1, 8.0);
        assert_eq!(stack.quantity, 4);
        assert_eq!(stack.durability, 5.0);
    }

    #[test]
    fn split_keeps_durability_and_refuses_whole_stack() {
        let mut stack = ItemStack::new("arrow", 10, 2.5);
        let part = stack.split_off(4).unwrap();
        assert_eq!(part, ItemStack::new("arrow", 4, 2.5));
        assert_eq!(stack.quantity, 6);

        assert!(stack.split_off(6).is_none());
        assert!(stack.split_off(0).is_none());
        assert_eq!(stack.quantity, 6);
    }
}
