/// Prompts known to produce good models, shown by `cadgen examples`
pub const EXAMPLE_PROMPTS: [&str; 5] = [
    "A gear with 20 teeth",
    "A simple cube with a hole in the center",
    "A coffee mug with handle",
    "A screwdriver with phillips head",
    "A simple wrench",
];
