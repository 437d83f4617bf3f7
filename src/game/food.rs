use super::board::Occupancy;
use super::types::{FoodId, FoodView, Occupant, Position};

#[derive(Debug, Clone)]
pub struct Food {
    id: FoodId,
    position: Option<Position>,
}

impl Food {
    pub fn new(id: FoodId) -> Self {
        Self { id, position: None }
    }

    pub fn id(&self) -> FoodId {
        self.id
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Moves the food to `pos`, releasing its previous cell first.
    pub fn update_position<B: Occupancy>(&mut self, board: &mut B, pos: Position) {
        if let Some(old) = self.position.take() {
            board.release(old, Occupant::Food(self.id));
        }
        board.claim(pos, Occupant::Food(self.id));
        self.position = Some(pos);
    }

    /// Takes the food off the board until a free cell turns up.
    pub fn unplace<B: Occupancy>(&mut self, board: &mut B) {
        if let Some(old) = self.position.take() {
            board.release(old, Occupant::Food(self.id));
        }
    }

    pub fn view(&self) -> Option<FoodView> {
        self.position.map(|pos| FoodView {
            id: self.id,
            x: pos.x,
            y: pos.y,
        })
    }
}
