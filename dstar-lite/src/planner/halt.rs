/*
 * Copyright (C) 2023 Open Source Robotics Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
*/

use crate::algorithm::Measure;
use std::{ops::Fn, sync::Arc};

/// A trait to define conditions in which a repair should be halted before it
/// converges. The planner checks it once per iteration of its repair loop,
/// passing in its frontier queue.
///
/// A halted repair is not lost. The frontier is retained, so the next call to
/// [`crate::Planner::plan`] picks up where the halted one stopped.
pub trait Halt<Mem>: Clone {
    /// Check whether the current repair should be interrupted.
    fn halt(&mut self, memory: &Mem) -> bool;
}

/// If an empty tuple is given for the halting behavior then we let the repair
/// run until it converges.
impl<Mem> Halt<Mem> for () {
    fn halt(&mut self, _: &Mem) -> bool {
        false
    }
}

/// Tell the planner to interrupt its repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Interruption {
    Continue,
    Stop,
}

/// Signature for an object that can interrupt the planner.
pub type Interrupter = Arc<dyn Fn() -> Interruption>;

/// This option allows the user to specify a callback to indicate whether the
/// repair should continue.
#[derive(Clone)]
pub struct Interruptible(pub Option<Interrupter>);

impl Interruptible {
    pub fn new<F: Fn() -> Interruption + 'static>(f: F) -> Self {
        Self(Some(Arc::new(f)))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl<Mem> Halt<Mem> for Interruptible {
    fn halt(&mut self, _: &Mem) -> bool {
        if let Some(interrupter) = &self.0 {
            return Interruption::Stop == interrupter();
        }

        false
    }
}

/// This option sets a maximum number of repair iterations that can be taken
/// before the planner is told to halt.
#[derive(Debug, Clone)]
pub struct StepLimit {
    steps: usize,
    pub limit: Option<usize>,
}

impl StepLimit {
    pub fn new(limit: Option<usize>) -> Self {
        Self { steps: 0, limit }
    }

    pub fn reset(&mut self) {
        self.steps = 0;
    }
}

impl<Mem> Halt<Mem> for StepLimit {
    fn halt(&mut self, _: &Mem) -> bool {
        self.steps += 1;
        if let Some(limit) = self.limit {
            return self.steps > limit;
        }

        false
    }
}

/// The maximum size that the memory's [`Measure`] can reach before the repair
/// quits. For the planner this puts a limit on how large the frontier queue
/// can get.
#[derive(Debug, Default, Clone)]
pub struct MeasureLimit(pub Option<usize>);

impl<Mem> Halt<Mem> for MeasureLimit
where
    Mem: Measure,
{
    fn halt(&mut self, memory: &Mem) -> bool {
        if let Some(limit) = self.0 {
            return memory.size() > limit;
        }

        false
    }
}

/// Tuples of Halt<M> will also implement Halt<M>, halting as soon as any one
/// of the tuple elements says to halt. We currently limit the tuple size to 8
/// elements, but that limit can be overcome using nested tuples.
macro_rules! or_tuple_halt {
    ( $( $name:ident )+ ) => {
        paste::paste! {
            impl<Mem, $($name: Halt<Mem>),+> Halt<Mem> for ($($name,)+) {
                fn halt(
                    &mut self,
                    memory: &Mem,
                ) -> bool {
                    let ($([<$name:lower>],)+) = self;
                    false $(|| [<$name:lower>].halt(memory))+
                }
            }
        }
    };
}

or_tuple_halt! { A }
or_tuple_halt! { A B }
or_tuple_halt! { A B C }
or_tuple_halt! { A B C D }
or_tuple_halt! { A B C D E }
or_tuple_halt! { A B C D E F }
or_tuple_halt! { A B C D E F G }
or_tuple_halt! { A B C D E F G H }

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeMem(usize);

    impl Measure for FakeMem {
        fn size(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn test_tuple_options() {
        let mut halting = (
            Interruptible::new(|| Interruption::Continue),
            StepLimit::new(Some(10)),
        );

        assert!(!halting.halt(&FakeMem(0)));

        let mut halting = (
            Interruptible::new(|| Interruption::Continue),
            StepLimit::new(Some(5)),
            MeasureLimit(Some(100)),
        );

        for _ in 0..5 {
            assert!(!halting.halt(&FakeMem(0)));
        }
        assert!(halting.halt(&FakeMem(0)));
    }

    #[test]
    fn test_measure_limit() {
        let mut halting = MeasureLimit(Some(3));
        assert!(!halting.halt(&FakeMem(3)));
        assert!(halting.halt(&FakeMem(4)));
        assert!(!MeasureLimit(None).halt(&FakeMem(1000)));
    }

    #[test]
    fn test_interruptible() {
        let stop = Rc::new(Cell::new(false));
        let flag = stop.clone();
        let mut halting = Interruptible::new(move || {
            if flag.get() {
                Interruption::Stop
            } else {
                Interruption::Continue
            }
        });

        assert!(!halting.halt(&FakeMem(0)));
        stop.set(true);
        assert!(halting.halt(&FakeMem(0)));
        assert!(!Interruptible::none().halt(&FakeMem(0)));
    }
}
