//! Table configuration: participants, teams, deck composition and groups.
//!
//! [`GameConfig`] is the serialisable description. [`Rules`] is its validated,
//! indexed form: every card gets a compact index (its position in the
//! configured deck) and every group a [`GroupId`], so belief tables can be dense
//! arrays without hashing.

use crate::error::ConfigurationError;
use crate::model::card::{Card, STANDARD_DECK_SIZE, all_cards};
use crate::model::half_suit::HalfSuit;
use crate::model::seat::{Seat, TeamId};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const STANDARD_PARTICIPANTS: usize = 6;
const STANDARD_HAND_SIZE: u8 = 9;

/// Compact group identifier: position of the group in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(u8);

impl GroupId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub label: String,
    pub cards: Vec<Card>,
}

/// Serialisable table description.
///
/// `teams[p]` is the team of participant `p`; `hand_sizes[p]` its initial deal size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub teams: Vec<TeamId>,
    pub deck: Vec<Card>,
    pub groups: Vec<GroupConfig>,
    pub hand_sizes: Vec<u8>,
}

impl GameConfig {
    /// Six participants alternating between two teams, the 54-card deck and its nine half-suits.
    pub fn standard() -> Self {
        let groups = HalfSuit::ALL
            .iter()
            .map(|group| GroupConfig {
                label: group.to_string(),
                cards: group.cards().to_vec(),
            })
            .collect();
        Self {
            teams: (0..STANDARD_PARTICIPANTS).map(|p| (p % 2) as TeamId).collect(),
            deck: all_cards().collect(),
            groups,
            hand_sizes: vec![STANDARD_HAND_SIZE; STANDARD_PARTICIPANTS],
        }
    }

    pub fn participant_count(&self) -> usize {
        self.teams.len()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// A validated group: label and member card indices in configured order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    label: String,
    cards: Vec<usize>,
}

impl Group {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Card indices of the group's members.
    pub fn cards(&self) -> &[usize] {
        &self.cards
    }

    pub fn size(&self) -> u8 {
        self.cards.len() as u8
    }
}

/// Validated, indexed rule set shared read-only by every belief state of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    teams: Vec<TeamId>,
    deck: Vec<Card>,
    index_by_id: [Option<usize>; STANDARD_DECK_SIZE],
    group_of: Vec<GroupId>,
    groups: Vec<Group>,
    hand_sizes: Vec<u8>,
    teammates: Vec<Vec<Seat>>,
    opponents: Vec<Vec<Seat>>,
}

impl Rules {
    pub fn new(config: GameConfig) -> Result<Self, ConfigurationError> {
        let participants = config.teams.len();
        if participants < 2 {
            return Err(ConfigurationError::TooFewParticipants(participants));
        }
        if participants > u8::MAX as usize {
            return Err(ConfigurationError::TooManyParticipants(participants));
        }

        if config.deck.is_empty() {
            return Err(ConfigurationError::EmptyDeck);
        }

        let mut index_by_id = [None; STANDARD_DECK_SIZE];
        for (index, card) in config.deck.iter().enumerate() {
            let slot = &mut index_by_id[card.to_id() as usize];
            if slot.is_some() {
                return Err(ConfigurationError::DuplicateCard(*card));
            }
            *slot = Some(index);
        }

        let mut group_of: Vec<Option<GroupId>> = vec![None; config.deck.len()];
        let mut labels = HashSet::new();
        let mut groups = Vec::with_capacity(config.groups.len());
        for (group_index, group) in config.groups.iter().enumerate() {
            if group.cards.is_empty() || group.cards.len() > u8::MAX as usize {
                return Err(ConfigurationError::GroupSize {
                    label: group.label.clone(),
                    size: group.cards.len(),
                });
            }
            if !labels.insert(group.label.clone()) {
                return Err(ConfigurationError::DuplicateGroupLabel(group.label.clone()));
            }
            let id = GroupId::new(group_index as u8);
            let mut cards = Vec::with_capacity(group.cards.len());
            for card in &group.cards {
                let index = index_by_id[card.to_id() as usize]
                    .ok_or(ConfigurationError::CardNotInDeck(*card))?;
                if group_of[index].is_some() {
                    return Err(ConfigurationError::DuplicateCard(*card));
                }
                group_of[index] = Some(id);
                cards.push(index);
            }
            groups.push(Group {
                label: group.label.clone(),
                cards,
            });
        }
        let group_of = group_of
            .iter()
            .zip(&config.deck)
            .map(|(group, card)| group.ok_or(ConfigurationError::UngroupedCard(*card)))
            .collect::<Result<Vec<_>, _>>()?;

        if config.hand_sizes.len() != participants {
            return Err(ConfigurationError::HandSizeCount {
                expected: participants,
                found: config.hand_sizes.len(),
            });
        }
        let dealt: usize = config.hand_sizes.iter().map(|size| *size as usize).sum();
        if dealt != config.deck.len() {
            return Err(ConfigurationError::PopulationMismatch {
                expected: config.deck.len(),
                found: dealt,
            });
        }

        let seats: Vec<Seat> = (0..participants as u8).map(Seat::new).collect();
        let mut teammates = Vec::with_capacity(participants);
        let mut opponents = Vec::with_capacity(participants);
        for seat in &seats {
            let team = config.teams[seat.index()];
            let (same, other): (Vec<Seat>, Vec<Seat>) = seats
                .iter()
                .partition(|candidate| config.teams[candidate.index()] == team);
            if other.is_empty() {
                return Err(ConfigurationError::NoOpponents(*seat));
            }
            teammates.push(same);
            opponents.push(other);
        }

        Ok(Self {
            teams: config.teams,
            deck: config.deck,
            index_by_id,
            group_of,
            groups,
            hand_sizes: config.hand_sizes,
            teammates,
            opponents,
        })
    }

    pub fn standard() -> Self {
        Self::new(GameConfig::standard()).expect("standard configuration is valid")
    }

    pub fn participants(&self) -> usize {
        self.teams.len()
    }

    pub fn seats(&self) -> impl Iterator<Item = Seat> + Clone + use<> {
        (0..self.teams.len() as u8).map(Seat::new)
    }

    pub fn contains_seat(&self, seat: Seat) -> bool {
        seat.index() < self.teams.len()
    }

    pub fn team_of(&self, seat: Seat) -> TeamId {
        self.teams[seat.index()]
    }

    pub fn are_opponents(&self, a: Seat, b: Seat) -> bool {
        self.team_of(a) != self.team_of(b)
    }

    /// Members of `seat`'s team in seat order, `seat` included.
    pub fn teammates(&self, seat: Seat) -> &[Seat] {
        &self.teammates[seat.index()]
    }

    pub fn opponents(&self, seat: Seat) -> &[Seat] {
        &self.opponents[seat.index()]
    }

    /// Number of cards in the deck.
    pub fn population(&self) -> usize {
        self.deck.len()
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn card(&self, index: usize) -> Card {
        self.deck[index]
    }

    pub fn index_of(&self, card: Card) -> Option<usize> {
        self.index_by_id[card.to_id() as usize]
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> + Clone + use<> {
        (0..self.groups.len() as u8).map(GroupId::new)
    }

    pub fn contains_group(&self, group: GroupId) -> bool {
        group.index() < self.groups.len()
    }

    pub fn group(&self, group: GroupId) -> &Group {
        &self.groups[group.index()]
    }

    /// Group of the card at `index`.
    pub fn group_of(&self, index: usize) -> GroupId {
        self.group_of[index]
    }

    pub fn group_of_card(&self, card: Card) -> Option<GroupId> {
        self.index_of(card).map(|index| self.group_of[index])
    }

    pub fn group_by_label(&self, label: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|group| group.label == label)
            .map(|index| GroupId::new(index as u8))
    }

    /// Looks up a standard half-suit by its label.
    pub fn half_suit(&self, half_suit: HalfSuit) -> Option<GroupId> {
        self.group_by_label(&half_suit.to_string())
    }

    pub fn initial_hand_size(&self, seat: Seat) -> u8 {
        self.hand_sizes[seat.index()]
    }

    pub fn initial_hand_sizes(&self) -> &[u8] {
        &self.hand_sizes
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::standard()
    }
}
