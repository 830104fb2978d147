//! Passive-aggressive message bank, keyed by tier.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Tier hours paired with their messages. Every list is non-empty.
pub static MESSAGE_BANK: &[(u32, &[&str])] = &[
    (
        2,
        &[
            "Hey! Just noticed you've been at your screen for 2 hours. No big deal. Just... keeping track. For science.",
            "2 hours in. I'm sure you've been super productive. I believe in you. Mostly.",
            "Quick check-in: 2 hours of screen time. Have you blinked recently? Just wondering.",
            "2 hours. That's fine. Totally fine. Everything is fine.",
        ],
    ),
    (
        4,
        &[
            "4 hours. Cool cool cool. I'm sure it's all very important work and definitely not doomscrolling.",
            "Fun fact: you've been staring at a glowing rectangle for 4 hours. Your ancestors fought bears. Just saying.",
            "4 hours of screen time. You know what takes 4 hours? Hiking a mountain. Learning to cook risotto. Just throwing that out there.",
            "Wow, 4 hours already? Time flies when you're... sitting completely still... staring at light...",
        ],
    ),
    (
        6,
        &[
            "6 hours. Six. Your eyes called. They'd like to see something that isn't backlit.",
            "Half a waking day. On a screen. I'm not mad, I'm just disappointed. Actually no, I'm a little mad.",
            "6 hours. At this point your chair has more of a relationship with you than most humans do.",
            "You've hit 6 hours. The sun exists, btw. It's that bright thing outside. You might remember it.",
        ],
    ),
    (
        8,
        &[
            "8 hours. A full workday of screen time. Except we both know at least 2 of those hours weren't work.",
            "At 8 hours, your screen isn't a tool anymore. It's a lifestyle. A concerning one.",
            "8 hours in. At what point does the screen start using you? Asking for a friend.",
            "Congratulations on 8 hours! That's almost impressive if it weren't so deeply sad.",
        ],
    ),
    (
        10,
        &[
            "10 hours. I've run out of clever things to say. Please go outside. I'm literally begging you.",
            "TEN. HOURS. Even your laptop is tired of you. I can hear the fan crying.",
            "10 hours of screen time. This isn't a flex. This is a cry for help. YOUR cry for help.",
            "You've been here 10 hours. I'm going to start sending these every 5 minutes until you stop.",
        ],
    ),
    (
        12,
        &[
            "12 hours. I'm calling this what it is: a hostage situation. Blink twice if you need help.",
            "Twelve hours. TWELVE. I'm genuinely worried about you. When did you last see the sky?",
            "12 hours in. Your screen-to-life ratio is now officially concerning. Even by tech bro standards.",
            "At 12 hours, I'm no longer passive-aggressive. I'm just aggressive. GO. OUTSIDE. NOW.",
        ],
    ),
];

/// Messages for a tier, if the bank has any.
pub fn messages_for(threshold: u32) -> Option<&'static [&'static str]> {
    MESSAGE_BANK
        .iter()
        .find(|(tier, _)| *tier == threshold)
        .map(|(_, messages)| *messages)
}

/// Every tier the bank knows about, ascending.
pub fn default_thresholds() -> Vec<u32> {
    let mut tiers: Vec<u32> = MESSAGE_BANK.iter().map(|(tier, _)| *tier).collect();
    tiers.sort_unstable();
    tiers
}

/// Uniform random selection from the bank.
pub struct MessagePicker {
    rng: StdRng,
}

impl Default for MessagePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagePicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic picks for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn pick(&mut self, threshold: u32) -> Option<&'static str> {
        messages_for(threshold)?.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_tier_has_messages() {
        for (tier, messages) in MESSAGE_BANK {
            assert!(!messages.is_empty(), "tier {tier} has no messages");
        }
    }

    #[test]
    fn default_thresholds_match_bank() {
        assert_eq!(default_thresholds(), vec![2, 4, 6, 8, 10, 12]);
    }

    #[test]
    fn pick_returns_a_message_from_the_tier() {
        let mut picker = MessagePicker::with_seed(7);
        let msg = picker.pick(4).unwrap();
        assert!(messages_for(4).unwrap().contains(&msg));
    }

    #[test]
    fn unknown_tier_has_nothing_to_say() {
        let mut picker = MessagePicker::with_seed(7);
        assert!(picker.pick(3).is_none());
        assert!(messages_for(3).is_none());
    }

    #[test]
    fn repeated_picks_vary() {
        let mut picker = MessagePicker::with_seed(42);
        let seen: HashSet<&str> = (0..64).filter_map(|_| picker.pick(2)).collect();
        assert!(seen.len() > 1);
    }
}
