use crate::config::{DEFAULT_EXPLORATION, DEFAULT_MCTS_TIME_BUDGET_SECS, MctsConfig};
use crate::game::{Game, Symbol};
use crate::mcts_node::{MctsNode, SENTINEL, uct_value};
use crate::random::{CustomNumberGenerator, RandomGenerator, StandardRandomGenerator};
use crate::strategy::Strategy;
use ego_tree::{NodeId, Tree};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// How a simulated game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playout {
    Won(Symbol),
    Draw,
}

/// The main struct for running the Monte Carlo Tree Search algorithm.
///
/// It holds the search tree, the random number generator, and the limits of the search. Each
/// search owns its tree; nothing is reused between moves.
pub struct MonteCarloTreeSearch<'g, G: Game, K: RandomGenerator> {
    game: &'g G,
    tree: Tree<MctsNode<G>>,
    random: K,
    exploration: f64,
    time_budget: Option<Duration>,
    max_iterations: Option<u32>,
    iterations: u32,
    next_action: MctsAction,
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
pub struct MonteCarloTreeSearchBuilder<'g, G: Game, K: RandomGenerator> {
    game: &'g G,
    state: G::State,
    random_generator: K,
    exploration: f64,
    time_budget: Option<Duration>,
    max_iterations: Option<u32>,
}

impl<'g, G: Game, K: RandomGenerator> MonteCarloTreeSearchBuilder<'g, G, K> {
    /// Creates a new builder searching from `state`.
    pub fn new(game: &'g G, state: G::State) -> Self {
        Self {
            game,
            state,
            random_generator: K::default(),
            exploration: DEFAULT_EXPLORATION,
            time_budget: Some(Duration::from_secs_f64(DEFAULT_MCTS_TIME_BUDGET_SECS)),
            max_iterations: None,
        }
    }

    /// Sets the random number generator used for expansion and rollouts.
    pub fn with_random_generator(mut self, rg: K) -> Self {
        self.random_generator = rg;
        self
    }

    /// Sets the UCT exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Sets the wall-clock budget of [`MonteCarloTreeSearch::search`]. `None` removes it.
    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    /// Caps the number of cycles run by [`MonteCarloTreeSearch::search`].
    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Takes exploration and limits from `config`. The seed is the caller's business since it
    /// decides the generator type.
    pub fn with_config(mut self, config: &MctsConfig) -> Self {
        self.exploration = config.exploration;
        self.time_budget = config.time_budget();
        self.max_iterations = config.max_iterations;
        self
    }

    /// Builds the search. With neither a time budget nor a cycle cap the default time budget
    /// is put back, so `search` always terminates.
    pub fn build(self) -> MonteCarloTreeSearch<'g, G, K> {
        let time_budget = match (self.time_budget, self.max_iterations) {
            (None, None) => Some(Duration::from_secs_f64(DEFAULT_MCTS_TIME_BUDGET_SECS)),
            (budget, _) => budget,
        };

        MonteCarloTreeSearch {
            game: self.game,
            tree: Tree::new(MctsNode::new(self.game, self.state, None)),
            random: self.random_generator,
            exploration: self.exploration,
            time_budget,
            max_iterations: self.max_iterations,
            iterations: 0,
            next_action: MctsAction::Selection { updated: vec![] },
        }
    }
}

impl<'g, G: Game, K: RandomGenerator> MonteCarloTreeSearch<'g, G, K> {
    /// Returns a new builder for `MonteCarloTreeSearch`.
    pub fn builder(game: &'g G, state: G::State) -> MonteCarloTreeSearchBuilder<'g, G, K> {
        MonteCarloTreeSearchBuilder::new(game, state)
    }

    /// Returns an immutable reference to the underlying search tree.
    pub fn tree(&self) -> &Tree<MctsNode<G>> {
        &self.tree
    }

    /// Returns the root node, which holds the position being searched.
    pub fn root(&self) -> &MctsNode<G> {
        self.tree.root().value()
    }

    /// Returns the next MCTS action to be performed. Useful for debugging and visualization.
    pub fn next_action(&self) -> &MctsAction {
        &self.next_action
    }

    /// Number of completed cycles.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hands the generator back, e.g. to keep a seeded sequence going across moves.
    pub fn into_random_generator(self) -> K {
        self.random
    }

    /// Executes a single step of the MCTS algorithm (Selection, Expansion, Simulation, or
    /// Backpropagation).
    pub fn execute_action(&mut self) {
        trace!(step = self.next_action.name(), "mcts step");
        self.next_action = match std::mem::take(&mut self.next_action) {
            MctsAction::Selection { .. } => MctsAction::Expansion {
                leaf: self.select_leaf(),
            },
            MctsAction::Expansion { leaf } => MctsAction::Simulation {
                node: self.expand(leaf),
            },
            MctsAction::Simulation { node } => MctsAction::Backpropagation {
                result: self.simulate(node),
                node,
            },
            MctsAction::Backpropagation { node, result } => {
                let updated = self.backpropagate(node, result);
                self.iterations += 1;
                MctsAction::Selection { updated }
            }
        };
    }

    /// Performs one full cycle and returns the nodes updated during backpropagation, from the
    /// simulated node up to the root.
    pub fn do_iteration(&mut self) -> Vec<NodeId> {
        loop {
            self.execute_action();
            if let MctsAction::Selection { updated } = &self.next_action {
                return updated.clone();
            }
        }
    }

    /// Runs exactly `n` cycles, ignoring the configured limits.
    pub fn iterate_n_times(&mut self, n: u32) {
        for _ in 0..n {
            self.do_iteration();
        }
    }

    /// Runs cycles until the time budget or the cycle cap is exhausted and returns the most
    /// visited move. At least one cycle always runs.
    pub fn search(&mut self) -> Option<G::Action> {
        let start = Instant::now();
        let deadline = self.time_budget.map(|budget| start + budget);
        let root_is_terminal = self.game.terminal_test(&self.root().state);

        loop {
            self.do_iteration();

            let out_of_time = deadline.is_some_and(|deadline| Instant::now() >= deadline);
            let out_of_cycles = self.max_iterations.is_some_and(|n| self.iterations >= n);
            if out_of_time || out_of_cycles || root_is_terminal {
                break;
            }
        }

        let best = self.most_visited_move();
        debug!(
            iterations = self.iterations,
            elapsed = ?start.elapsed(),
            best = ?best,
            "mcts search finished"
        );
        best
    }

    /// The move leading to the root child with the most visits, first one on ties.
    ///
    /// A root without children (nothing searched yet, or a finished game) falls back to the first
    /// legal action. `None` only if there are no legal actions at all.
    pub fn most_visited_move(&self) -> Option<G::Action> {
        let root = self.tree.root();
        let mut best: Option<&MctsNode<G>> = None;
        for child in root.children() {
            let node = child.value();
            if best.is_none_or(|b| node.visit_count > b.visit_count) {
                best = Some(node);
            }
        }

        best.and_then(|node| node.prev_move.clone())
            .or_else(|| self.game.actions(&root.value().state).first().cloned())
    }

    /// Descends from the root along the highest UCT value until a node without children.
    fn select_leaf(&self) -> NodeId {
        let mut node = self.tree.root();
        loop {
            let parent_visits = node.value().visit_count;
            let mut best = None;
            let mut best_value = f64::NEG_INFINITY;
            for child in node.children() {
                let stats = child.value();
                let value = uct_value(
                    stats.accumulated_score,
                    stats.visit_count,
                    parent_visits,
                    self.exploration,
                );
                if best.is_none() || value > best_value {
                    best = Some(child);
                    best_value = value;
                }
            }

            match best {
                Some(child) => node = child,
                None => return node.id(),
            }
        }
    }

    /// Adds one child per legal action under a non-terminal leaf and picks the node to
    /// simulate from: a random new child, or the leaf itself if it has none.
    fn expand(&mut self, leaf: NodeId) -> NodeId {
        let game = self.game;
        let Some(mut node) = self.tree.get_mut(leaf) else {
            return leaf;
        };
        if game.terminal_test(&node.value().state) {
            return leaf;
        }

        let state = node.value().state.clone();
        let mut children = Vec::with_capacity(game.actions(&state).len());
        for action in game.actions(&state) {
            let child = MctsNode::new(game, game.result(&state, action), Some(action.clone()));
            children.push(node.append(child).id());
        }

        self.random.choose(&children).copied().unwrap_or(leaf)
    }

    /// Plays uniformly random moves from the node's state to the end of the game.
    ///
    /// A node that is already won skips the rollout and marks its parent as a forced loss for
    /// the player who moved into the parent.
    fn simulate(&mut self, id: NodeId) -> Playout {
        let game = self.game;
        let Some(node) = self.tree.get(id) else {
            return Playout::Draw;
        };
        let mut state = node.value().state.clone();
        let parent = node.parent().map(|parent| parent.id());

        if let Some(winner) = game.winner(&state) {
            if let Some(mut parent) = parent.and_then(|parent| self.tree.get_mut(parent)) {
                let parent = parent.value();
                parent.accumulated_score = if parent.to_move == winner {
                    -SENTINEL
                } else {
                    SENTINEL
                };
            }
            return Playout::Won(winner);
        }

        while !game.terminal_test(&state) {
            let Some(action) = self.random.choose(game.actions(&state)).cloned() else {
                break;
            };
            state = game.result(&state, &action);
        }

        match game.winner(&state) {
            Some(winner) => Playout::Won(winner),
            None => Playout::Draw,
        }
    }

    /// Propagates the result of a simulation back up the tree, updating node statistics.
    fn backpropagate(&mut self, id: NodeId, result: Playout) -> Vec<NodeId> {
        let branch: Vec<NodeId> = match self.tree.get(id) {
            Some(node) => std::iter::once(node)
                .chain(node.ancestors())
                .map(|node| node.id())
                .collect(),
            None => return vec![],
        };

        for &node_id in &branch {
            let Some(mut node) = self.tree.get_mut(node_id) else {
                continue;
            };
            let stats = node.value();
            stats.visit_count += 1;
            if let Playout::Won(winner) = result {
                stats.accumulated_score += if stats.is_credited_to(winner) {
                    SENTINEL
                } else {
                    -SENTINEL
                };
            }
        }

        branch
    }
}

impl<'g, G: Game> MonteCarloTreeSearch<'g, G, StandardRandomGenerator> {
    /// A search with default settings and thread-local randomness.
    pub fn from_state(game: &'g G, state: G::State) -> Self {
        MonteCarloTreeSearchBuilder::new(game, state).build()
    }
}

/// Represents the four main stages of the MCTS algorithm.
///
/// This enum is used to manage the state of the search process.
#[derive(Debug, PartialEq, Clone)]
pub enum MctsAction {
    /// **Selection**: descend from the root to a leaf by UCT.
    Selection {
        /// The nodes updated by the previous backpropagation.
        updated: Vec<NodeId>,
    },
    /// **Expansion**: create the children of the selected leaf.
    Expansion { leaf: NodeId },
    /// **Simulation**: play out the game from `node`.
    Simulation { node: NodeId },
    /// **Backpropagation**: update the statistics from `node` up to the root.
    Backpropagation { node: NodeId, result: Playout },
}

impl Default for MctsAction {
    fn default() -> Self {
        MctsAction::Selection { updated: vec![] }
    }
}

impl MctsAction {
    /// Returns the name of the current MCTS action.
    pub fn name(&self) -> &'static str {
        match self {
            MctsAction::Selection { .. } => "Selection",
            MctsAction::Expansion { .. } => "Expansion",
            MctsAction::Simulation { .. } => "Simulation",
            MctsAction::Backpropagation { .. } => "Backpropagation",
        }
    }
}

/// Plays by running a fresh Monte Carlo search for every move.
#[derive(Debug, Clone)]
pub struct MonteCarloPlayer<K: RandomGenerator = CustomNumberGenerator> {
    config: MctsConfig,
    random: K,
}

impl MonteCarloPlayer {
    /// Seeds the generator from `config.seed`, or randomly when there is none.
    pub fn new(config: MctsConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            random: CustomNumberGenerator::new(seed),
        }
    }
}

impl<K: RandomGenerator> MonteCarloPlayer<K> {
    pub fn with_random_generator<R: RandomGenerator>(self, random: R) -> MonteCarloPlayer<R> {
        MonteCarloPlayer {
            config: self.config,
            random,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

impl<G: Game, K: RandomGenerator> Strategy<G> for MonteCarloPlayer<K> {
    fn choose(&mut self, game: &G, state: &G::State) -> Option<G::Action> {
        let mut mcts = MonteCarloTreeSearch::builder(game, state.clone())
            .with_config(&self.config)
            .with_random_generator(std::mem::take(&mut self.random))
            .build();
        let action = mcts.search();
        self.random = mcts.into_random_generator();
        action
    }
}
