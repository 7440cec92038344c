// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The collective gather.  A `Group` hands out one `Communicator` per
//! rank; each participant spends its communicator on exactly one call
//! to `gather`, which blocks until every participant has arrived.
//! Contributions travel rank-tagged, so the root can lay them down in
//! rank order no matter in which order they turn up, and each one
//! carries its own length, so bands need not be the same size.
//!
//! The gather is all-or-nothing.  If a participant drops its
//! communicator without contributing, or contributes the wrong amount,
//! the root returns an error and no image.

use crossbeam::channel::{unbounded, Receiver, Sender};
use crossbeam::sync::WaitGroup;

use errors::RenderError;

/// One participant's buffer, tagged with the rank that produced it.
#[derive(Debug)]
struct Contribution {
    rank: usize,
    pixels: Vec<u8>,
}

#[derive(Debug)]
enum Role {
    Root {
        inbox: Receiver<Contribution>,
        expected: Vec<usize>,
    },
    Member {
        outbox: Sender<Contribution>,
    },
}

/// A participant's handle on the group.
#[derive(Debug)]
pub struct Communicator {
    rank: usize,
    size: usize,
    barrier: WaitGroup,
    role: Role,
}

/// A fixed set of communicators, one for each rank.
#[derive(Debug)]
pub struct Group {
    members: Vec<Communicator>,
}

impl Group {
    /// Builds a group with one participant per entry of `expected`,
    /// which gives the number of values each rank will contribute.
    /// `root` is the rank that receives the gathered buffer.
    pub fn new(root: usize, expected: Vec<usize>) -> Result<Group, RenderError> {
        let size = expected.len();
        if size == 0 {
            return Err(RenderError::Partition(
                "A group needs at least one participant".to_string(),
            ));
        }
        if root >= size {
            return Err(RenderError::Partition(format!(
                "Root {} does not exist in a group of {}",
                root, size
            )));
        }

        let (outbox, inbox) = unbounded();
        let barrier = WaitGroup::new();
        let mut members: Vec<Communicator> = (0..size)
            .filter(|&rank| rank != root)
            .map(|rank| Communicator {
                rank,
                size,
                barrier: barrier.clone(),
                role: Role::Member {
                    outbox: outbox.clone(),
                },
            })
            .collect();
        members.insert(
            root,
            Communicator {
                rank: root,
                size,
                barrier,
                role: Role::Root { inbox, expected },
            },
        );

        Ok(Group { members })
    }

    /// The number of participants.
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

impl IntoIterator for Group {
    type Item = Communicator;
    type IntoIter = ::std::vec::IntoIter<Communicator>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl Communicator {
    /// This participant's rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The number of participants in the group.
    pub fn size(&self) -> usize {
        self.size
    }

    /// True for the participant that receives the gathered buffer.
    pub fn is_root(&self) -> bool {
        match self.role {
            Role::Root { .. } => true,
            Role::Member { .. } => false,
        }
    }

    /// Contributes `local` and waits for the rest of the group.  The
    /// root gets back every contribution concatenated in rank order;
    /// everybody else gets `None`.
    pub fn gather(self, local: Vec<u8>) -> Result<Option<Vec<u8>>, RenderError> {
        let Communicator {
            rank,
            size,
            barrier,
            role,
        } = self;

        debug!("rank {} waiting at the gather with {} values", rank, local.len());
        barrier.wait();

        match role {
            Role::Member { outbox } => {
                outbox
                    .send(Contribution {
                        rank,
                        pixels: local,
                    })
                    .map_err(|_| {
                        RenderError::CollectiveFailure(format!(
                            "rank {} could not reach the root",
                            rank
                        ))
                    })?;
                Ok(None)
            }
            Role::Root { inbox, expected } => {
                let mut slots: Vec<Option<Vec<u8>>> = vec![None; size];
                place(&mut slots, &expected, Contribution { rank, pixels: local })?;

                for received in 1..size {
                    let contribution = inbox.recv().map_err(|_| {
                        RenderError::CollectiveFailure(format!(
                            "{} of {} participants never contributed",
                            size - received,
                            size
                        ))
                    })?;
                    place(&mut slots, &expected, contribution)?;
                }

                let mut global = Vec::with_capacity(expected.iter().sum());
                for slot in slots {
                    match slot {
                        Some(pixels) => global.extend(pixels),
                        None => {
                            return Err(RenderError::CollectiveFailure(
                                "a rank is missing from the gather".to_string(),
                            ))
                        }
                    }
                }
                Ok(Some(global))
            }
        }
    }
}

/// Puts a contribution into its rank's slot after checking it is the
/// size that rank was expected to send.
fn place(
    slots: &mut [Option<Vec<u8>>],
    expected: &[usize],
    contribution: Contribution,
) -> Result<(), RenderError> {
    let Contribution { rank, pixels } = contribution;
    if rank >= slots.len() || slots[rank].is_some() {
        return Err(RenderError::CollectiveFailure(format!(
            "unexpected contribution from rank {}",
            rank
        )));
    }
    if pixels.len() != expected[rank] {
        return Err(RenderError::CollectiveFailure(format!(
            "rank {} sent {} values, expected {}",
            rank,
            pixels.len(),
            expected[rank]
        )));
    }
    slots[rank] = Some(pixels);
    Ok(())
}
