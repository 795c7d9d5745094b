/// Trait for generating room codes
pub trait RoomCodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Pet name-based room code generator, e.g. `brave-otter`
pub struct PetNameRoomCodeGenerator;

impl PetNameRoomCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PetNameRoomCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomCodeGenerator for PetNameRoomCodeGenerator {
    fn generate(&self) -> String {
        petname::Petnames::default().generate_one(2, "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_petname_room_code_generator() {
        let generator = PetNameRoomCodeGenerator::new();
        let code = generator.generate();

        assert!(!code.is_empty());
        assert_eq!(code.split('-').count(), 2);
    }
}
