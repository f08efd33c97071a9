//! Demon Kingdom entities and world state
//!
//! Pixel coordinates, top-left origin. Monsters walk in from the left and
//! must be stopped before they reach the right edge of the map.

use glam::IVec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::story::Script;
use super::waves;
use crate::consts::kingdom::{CLOCK_STEP, FRAME_RATE, MAP_HEIGHT, MAP_WIDTH, TITLE_CARD_TICKS};
use crate::sim::collision::Rect;
use crate::tuning::{
    FIREBALL_DAMAGE, GEM_SHEET, GEM_SPAWN_ODDS, GHOST_PUSHBACK, LEVEL_COUNT, SPELL_ICON_SIZE,
    SheetLayout, WHIRLWIND_MAX_LIFE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Bat,
    Demon,
    DemonLord,
    Dino,
    Genie,
    Golem,
    Ogre,
    Orc,
    Orc2,
    Plant,
    Skeleton,
    Slime,
    SoulTree,
    Tablet,
    Tree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellKind {
    Fireball,
    Whirlwind,
    Ghost,
}

/// Sprite-sheet animation driven by the shared clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub sheet: SheetLayout,
    pub frame: u32,
    pub last_time: u32,
}

impl Animation {
    pub fn new(sheet: SheetLayout) -> Self {
        Self {
            sheet,
            frame: 0,
            last_time: 0,
        }
    }

    /// Step to the next frame once `rate` clock units have passed
    pub fn advance(&mut self, clock: u32, rate: u32) {
        if clock > self.last_time + rate {
            self.frame += 1;
            if self.frame >= self.sheet.frames {
                self.frame = 0;
            }
            self.last_time = clock;
        }
    }

    /// Current frame's rectangle within the sheet
    pub fn source_rect(&self) -> Rect {
        let columns = self.sheet.columns.max(1);
        Rect::new(
            (self.frame % columns) as i32 * self.sheet.frame_width,
            (self.frame / columns) as i32 * self.sheet.frame_height,
            self.sheet.frame_width,
            self.sheet.frame_height,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    pub kind: MonsterKind,
    pub rect: Rect,
    pub speed: i32,
    pub life: u32,
    pub whole_life: u32,
    pub anim: Animation,
}

impl Monster {
    pub fn spawn(kind: MonsterKind, pos: IVec2) -> Self {
        let stats = kind.stats();
        let size = stats.sheet.frame_size();
        Self {
            kind,
            rect: Rect::new(pos.x, pos.y, size.x, size.y),
            speed: stats.speed,
            life: stats.life,
            whole_life: stats.life,
            anim: Animation::new(stats.sheet),
        }
    }

    /// Take one point of damage; true if this blow killed it
    pub fn hit(&mut self) -> bool {
        if self.life <= 1 {
            self.life = 0;
            true
        } else {
            self.life -= 1;
            false
        }
    }

    /// Percent chance (out of 100, exclusive) that it drops a gem on death
    pub fn gem_chance(&self) -> u32 {
        (2 * self.speed.max(0) as u32 + self.whole_life) * 3
    }

    pub fn is_dead(&self) -> bool {
        self.life == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gem {
    pub rect: Rect,
    pub anim: Animation,
}

impl Gem {
    pub fn at(pos: IVec2) -> Self {
        let size = GEM_SHEET.frame_size();
        Self {
            rect: Rect::new(pos.x, pos.y, size.x, size.y),
            anim: Animation::new(GEM_SHEET),
        }
    }
}

/// One pooled spell sprite; idle ones wait off screen until cast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellEffect {
    pub kind: SpellKind,
    pub rect: Rect,
    pub anim: Animation,
    pub active: bool,
}

impl SpellEffect {
    pub fn idle(kind: SpellKind) -> Self {
        let sheet = kind.stats().sheet;
        let size = sheet.frame_size();
        Self {
            kind,
            rect: Rect::new(0, 0, size.x, size.y),
            anim: Animation::new(sheet),
            active: false,
        }
    }

    /// Random launch point for this spell
    fn launch_position(kind: SpellKind, rng: &mut Pcg32) -> IVec2 {
        match kind {
            SpellKind::Fireball => IVec2::new(rng.random_range(30..=MAP_WIDTH - 30), -10),
            SpellKind::Whirlwind => IVec2::new(MAP_WIDTH + 20, rng.random_range(30..=MAP_HEIGHT - 30)),
            SpellKind::Ghost => IVec2::new(-10, rng.random_range(30..=MAP_HEIGHT - 30)),
        }
    }

    /// True once it has travelled past its end of the map
    fn is_spent(&self) -> bool {
        match self.kind {
            SpellKind::Fireball => self.rect.bottom() >= MAP_HEIGHT - 5,
            SpellKind::Whirlwind => self.rect.left() <= 5,
            SpellKind::Ghost => self.rect.left() >= MAP_WIDTH - 5,
        }
    }
}

/// Sidebar rectangle of a spell icon
pub fn spell_icon_rect(kind: SpellKind) -> Rect {
    let pos = kind.stats().icon_pos;
    Rect::new(pos.x, pos.y, SPELL_ICON_SIZE, SPELL_ICON_SIZE)
}

/// Which half of a level is on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wave {
    Random,
    Final,
}

/// Announcement shown over the map between waves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleCard {
    Level(u32),
    FinalWave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KingdomPhase {
    /// Story text scrolling up; `y` is the baseline of its last line
    Story { script: Script, y: i32 },
    /// Frozen map with a title card
    Card { card: TitleCard, ticks_left: u32 },
    Playing,
    GameOver { won: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KingdomEvent {
    SwordHit,
    MonsterSlain(MonsterKind),
    GemDropped,
    GemCollected,
    SpellCast(SpellKind),
    LevelStarted(u32),
    FinalWaveStarted,
    Victory,
    Defeat,
}

/// Complete Demon Kingdom state
#[derive(Debug, Clone)]
pub struct KingdomWorld {
    pub rng: Pcg32,
    pub phase: KingdomPhase,
    /// 1-based level
    pub level: u32,
    pub wave: Wave,
    pub gems_held: u32,
    pub monsters: Vec<Monster>,
    pub gems: Vec<Gem>,
    /// Every spell pool, idle effects included
    pub spells: Vec<SpellEffect>,
    /// Animation clock
    pub clock: u32,
    pub exit_requested: bool,
    events: Vec<KingdomEvent>,
}

impl KingdomWorld {
    /// A new run, starting with the intro story
    pub fn new(seed: u64) -> Self {
        let spells = SpellKind::ALL
            .iter()
            .flat_map(|&kind| (0..kind.stats().pool_size).map(move |_| SpellEffect::idle(kind)))
            .collect();
        Self {
            rng: Pcg32::seed_from_u64(seed),
            phase: KingdomPhase::Story {
                script: Script::Intro,
                y: Script::Intro.start_y(),
            },
            level: 1,
            wave: Wave::Random,
            gems_held: 0,
            monsters: Vec::new(),
            gems: Vec::new(),
            spells,
            clock: 1,
            exit_requested: false,
            events: Vec::new(),
        }
    }

    pub(crate) fn push_event(&mut self, event: KingdomEvent) {
        self.events.push(event);
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<KingdomEvent> {
        std::mem::take(&mut self.events)
    }

    /// Background picture index for the current level
    pub fn background(&self) -> usize {
        (self.level.clamp(1, LEVEL_COUNT) - 1) as usize
    }

    /// Start over from level I (skipping the intro)
    pub fn restart(&mut self) {
        self.level = 1;
        self.gems_held = 0;
        self.monsters.clear();
        self.gems.clear();
        for spell in &mut self.spells {
            spell.active = false;
        }
        self.announce_level();
    }

    fn announce_level(&mut self) {
        self.wave = Wave::Random;
        self.phase = KingdomPhase::Card {
            card: TitleCard::Level(self.level),
            ticks_left: TITLE_CARD_TICKS,
        };
        log::info!("Demon Kingdom: {}", crate::tuning::level_plan(self.level).name);
        self.push_event(KingdomEvent::LevelStarted(self.level));
    }

    fn next_level(&mut self) {
        self.level += 1;
        self.gems.clear();
        self.announce_level();
    }

    /// A story screen finished (scrolled off or skipped)
    pub fn finish_story(&mut self, script: Script) {
        match script {
            Script::Intro => {
                self.phase = KingdomPhase::Story {
                    script: Script::Help,
                    y: Script::Help.start_y(),
                };
            }
            Script::Help => self.announce_level(),
            Script::DemonSlain => self.next_level(),
            Script::DemonLordSlain => {
                log::info!("Demon Kingdom won");
                self.phase = KingdomPhase::GameOver { won: true };
                self.push_event(KingdomEvent::Victory);
            }
        }
    }

    /// A title card finished; release the matching wave
    pub fn finish_card(&mut self, card: TitleCard) {
        self.monsters = match card {
            TitleCard::Level(level) => waves::random_wave(level, &mut self.rng),
            TitleCard::FinalWave => waves::final_wave(self.level, &mut self.rng),
        };
        log::debug!("{} monsters released", self.monsters.len());
        self.phase = KingdomPhase::Playing;
    }

    /// Mouse click on the map or sidebar while playing
    pub fn click(&mut self, point: IVec2) {
        let mut slain = Vec::new();
        let mut swings = 0;
        for monster in &mut self.monsters {
            if monster.rect.contains(point) {
                swings += 1;
                if monster.hit() {
                    slain.push(monster.clone());
                }
            }
        }
        for _ in 0..swings {
            self.push_event(KingdomEvent::SwordHit);
        }
        self.bury(slain);

        let before = self.gems.len();
        self.gems.retain(|gem| !gem.rect.contains(point));
        for _ in self.gems.len()..before {
            self.gems_held += 1;
            self.push_event(KingdomEvent::GemCollected);
        }

        if let Some(kind) = SpellKind::ALL
            .into_iter()
            .find(|&kind| spell_icon_rect(kind).contains(point))
        {
            self.cast(kind);
        }
    }

    /// Spend gems on a spell; returns false if it could not be afforded
    pub fn cast(&mut self, kind: SpellKind) -> bool {
        let cost = kind.stats().cost;
        if self.gems_held < cost {
            return false;
        }
        self.gems_held -= cost;

        for spell in self.spells.iter_mut().filter(|s| s.kind == kind && !s.active) {
            let pos = SpellEffect::launch_position(kind, &mut self.rng);
            spell.rect = Rect::new(pos.x, pos.y, spell.rect.w, spell.rect.h);
            spell.active = true;
        }
        log::debug!("cast {:?}, {} gems left", kind, self.gems_held);
        self.push_event(KingdomEvent::SpellCast(kind));
        true
    }

    /// Remove dead monsters, rolling a gem drop for each one in `slain`
    fn bury(&mut self, slain: Vec<Monster>) {
        if slain.is_empty() {
            return;
        }
        self.monsters.retain(|m| !m.is_dead());
        for monster in slain {
            self.push_event(KingdomEvent::MonsterSlain(monster.kind));
            if self.rng.random_range(1..=100) < monster.gem_chance() {
                let left = monster.rect.left();
                let top = monster.rect.top();
                let pos = IVec2::new(
                    self.rng.random_range(left - 10..=left + 10),
                    self.rng.random_range(top - 10..=top + 10),
                );
                self.gems.push(Gem::at(pos));
                self.push_event(KingdomEvent::GemDropped);
            }
        }
    }

    /// Called when the field is empty
    fn progress(&mut self) {
        match self.wave {
            Wave::Random => {
                self.wave = Wave::Final;
                self.phase = KingdomPhase::Card {
                    card: TitleCard::FinalWave,
                    ticks_left: TITLE_CARD_TICKS,
                };
                self.push_event(KingdomEvent::FinalWaveStarted);
            }
            Wave::Final if self.level == 4 || self.level >= LEVEL_COUNT => {
                let script = if self.level >= LEVEL_COUNT {
                    Script::DemonLordSlain
                } else {
                    Script::DemonSlain
                };
                self.phase = KingdomPhase::Story {
                    script,
                    y: script.start_y(),
                };
            }
            Wave::Final => self.next_level(),
        }
    }

    /// One playing tick after input has been applied
    pub fn update(&mut self) {
        self.clock += CLOCK_STEP;

        if self.monsters.is_empty() {
            self.progress();
            return;
        }

        if self.rng.random_range(0..=GEM_SPAWN_ODDS) == GEM_SPAWN_ODDS {
            let pos = IVec2::new(
                self.rng.random_range(20..=MAP_WIDTH - 20),
                self.rng.random_range(36..=MAP_HEIGHT - 36),
            );
            self.gems.push(Gem::at(pos));
        }

        let clock = self.clock;
        let mut breached = false;
        for monster in &mut self.monsters {
            monster.anim.advance(clock, FRAME_RATE);
            monster.rect.x += monster.speed;
            breached |= monster.rect.left() >= MAP_WIDTH;
        }
        for gem in &mut self.gems {
            gem.anim.advance(clock, FRAME_RATE);
        }

        self.update_spells();

        if breached {
            log::info!("Demon Kingdom lost on level {}", self.level);
            self.phase = KingdomPhase::GameOver { won: false };
            self.push_event(KingdomEvent::Defeat);
        }
    }

    fn update_spells(&mut self) {
        let clock = self.clock;
        let mut slain = Vec::new();

        for spell in self.spells.iter_mut().filter(|s| s.active) {
            spell.anim.advance(clock, FRAME_RATE);
            spell.rect.translate(spell.kind.stats().velocity);
            let spent = spell.is_spent();

            let mut touched = false;
            for monster in self
                .monsters
                .iter_mut()
                .filter(|m| !m.is_dead() && m.rect.intersects(&spell.rect))
            {
                touched = true;
                match spell.kind {
                    SpellKind::Fireball => {
                        for _ in 0..FIREBALL_DAMAGE {
                            if monster.hit() {
                                slain.push(monster.clone());
                                break;
                            }
                        }
                    }
                    SpellKind::Whirlwind => {
                        if monster.life <= WHIRLWIND_MAX_LIFE {
                            monster.life = 0;
                            slain.push(monster.clone());
                        }
                    }
                    SpellKind::Ghost => monster.rect.x -= GHOST_PUSHBACK,
                }
            }

            if spent || (touched && spell.kind == SpellKind::Fireball) {
                spell.active = false;
            }
        }

        self.bury(slain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_world() -> KingdomWorld {
        let mut world = KingdomWorld::new(42);
        world.phase = KingdomPhase::Playing;
        world
    }

    #[test]
    fn test_animation_wraps() {
        let mut anim = Animation::new(SheetLayout::row(10, 10, 3));
        anim.advance(30, FRAME_RATE);
        assert_eq!(anim.frame, 0, "needs strictly more than the rate");
        anim.advance(31, FRAME_RATE);
        assert_eq!(anim.frame, 1);
        anim.advance(62, FRAME_RATE);
        anim.advance(93, FRAME_RATE);
        assert_eq!(anim.frame, 0);
        assert_eq!(anim.last_time, 93);
    }

    #[test]
    fn test_source_rect() {
        let mut anim = Animation::new(SheetLayout::row(16, 48, 6));
        anim.frame = 4;
        assert_eq!(anim.source_rect(), Rect::new(64, 0, 16, 48));
    }

    #[test]
    fn test_monster_hit_and_gem_chance() {
        let mut ogre = Monster::spawn(MonsterKind::Ogre, IVec2::new(0, 50));
        assert_eq!(ogre.rect, Rect::new(0, 50, 50, 58));
        assert_eq!(ogre.gem_chance(), (2 * 2 + 6) * 3);
        for _ in 0..5 {
            assert!(!ogre.hit());
        }
        assert_eq!(ogre.life, 1);
        assert!(ogre.hit());
        assert!(ogre.is_dead());
    }

    #[test]
    fn test_click_hits_every_monster_under_pointer() {
        let mut world = playing_world();
        world.monsters = vec![
            Monster::spawn(MonsterKind::Bat, IVec2::new(100, 100)),
            Monster::spawn(MonsterKind::Orc, IVec2::new(105, 100)),
            Monster::spawn(MonsterKind::Bat, IVec2::new(300, 100)),
        ];
        world.click(IVec2::new(110, 110));

        assert_eq!(world.monsters.len(), 2);
        assert_eq!(world.monsters[0].kind, MonsterKind::Orc);
        assert_eq!(world.monsters[0].life, 1);
        let events = world.drain_events();
        assert_eq!(events.iter().filter(|e| **e == KingdomEvent::SwordHit).count(), 2);
        assert!(events.contains(&KingdomEvent::MonsterSlain(MonsterKind::Bat)));
    }

    #[test]
    fn test_click_collects_gems() {
        let mut world = playing_world();
        world.gems = vec![Gem::at(IVec2::new(50, 50)), Gem::at(IVec2::new(200, 50))];
        world.click(IVec2::new(55, 60));
        assert_eq!(world.gems_held, 1);
        assert_eq!(world.gems.len(), 1);
    }

    #[test]
    fn test_cast_requires_gems() {
        let mut world = playing_world();
        world.gems_held = 4;
        assert!(!world.cast(SpellKind::Fireball));
        assert_eq!(world.gems_held, 4);

        world.gems_held = 7;
        assert!(world.cast(SpellKind::Fireball));
        assert_eq!(world.gems_held, 2);
        let launched: Vec<_> = world
            .spells
            .iter()
            .filter(|s| s.kind == SpellKind::Fireball && s.active)
            .collect();
        assert_eq!(launched.len(), 4);
        assert!(launched.iter().all(|s| s.rect.y == -10));
        assert!(launched.iter().all(|s| (30..=570).contains(&s.rect.x)));
    }

    #[test]
    fn test_click_on_icon_casts() {
        let mut world = playing_world();
        world.gems_held = 10;
        let icon = spell_icon_rect(SpellKind::Ghost);
        world.click(icon.top_left() + IVec2::new(5, 5));
        assert_eq!(world.gems_held, 0);
        assert_eq!(world.spells.iter().filter(|s| s.active).count(), 6);
        assert!(world.spells.iter().filter(|s| s.active).all(|s| s.rect.x == -10));
    }

    #[test]
    fn test_fireball_damages_and_retires() {
        let mut world = playing_world();
        world.monsters = vec![Monster::spawn(MonsterKind::Ogre, IVec2::new(200, 100))];
        let fireball = world
            .spells
            .iter_mut()
            .find(|s| s.kind == SpellKind::Fireball)
            .unwrap();
        fireball.active = true;
        fireball.rect = Rect::new(210, 60, 16, 48);

        world.update_spells();
        assert_eq!(world.monsters[0].life, 3);
        assert!(world.spells.iter().all(|s| !s.active));
    }

    #[test]
    fn test_whirlwind_only_kills_weak_monsters() {
        let mut world = playing_world();
        world.monsters = vec![
            Monster::spawn(MonsterKind::Slime, IVec2::new(300, 100)),
            Monster::spawn(MonsterKind::Golem, IVec2::new(300, 100)),
        ];
        let whirlwind = world
            .spells
            .iter_mut()
            .find(|s| s.kind == SpellKind::Whirlwind)
            .unwrap();
        whirlwind.active = true;
        whirlwind.rect = Rect::new(320, 110, 29, 32);

        world.update_spells();
        assert_eq!(world.monsters.len(), 1);
        assert_eq!(world.monsters[0].kind, MonsterKind::Golem);
        assert_eq!(world.monsters[0].life, 15);
        assert!(world.spells.iter().any(|s| s.active), "whirlwinds keep going");
    }

    #[test]
    fn test_whirlwind_kill_can_drop_a_gem() {
        let mut world = playing_world();
        let mut slime = Monster::spawn(MonsterKind::Slime, IVec2::new(300, 100));
        slime.whole_life = 40;
        world.monsters = vec![slime];
        let whirlwind = world
            .spells
            .iter_mut()
            .find(|s| s.kind == SpellKind::Whirlwind)
            .unwrap();
        whirlwind.active = true;
        whirlwind.rect = Rect::new(320, 110, 29, 32);

        world.update_spells();
        assert!(world.monsters.is_empty());
        assert_eq!(world.gems.len(), 1);
        let events = world.drain_events();
        assert!(events.contains(&KingdomEvent::MonsterSlain(MonsterKind::Slime)));
        assert!(events.contains(&KingdomEvent::GemDropped));
    }

    #[test]
    fn test_sure_drop_lands_near_top_left() {
        let mut world = playing_world();
        for _ in 0..50 {
            let mut bat = Monster::spawn(MonsterKind::Bat, IVec2::new(200, 150));
            // (2 * 3 + 40) * 3 is past any roll of 1..=100
            bat.whole_life = 40;
            bat.life = 0;
            world.bury(vec![bat]);
        }
        assert_eq!(world.gems.len(), 50);
        for gem in &world.gems {
            assert!((190..=210).contains(&gem.rect.x), "{:?}", gem.rect);
            assert!((140..=160).contains(&gem.rect.y), "{:?}", gem.rect);
        }
    }

    #[test]
    fn test_zero_chance_never_drops() {
        let mut world = playing_world();
        for _ in 0..200 {
            let mut bat = Monster::spawn(MonsterKind::Bat, IVec2::new(200, 150));
            bat.speed = 0;
            bat.whole_life = 0;
            bat.life = 0;
            world.bury(vec![bat]);
        }
        assert!(world.gems.is_empty());
    }

    #[test]
    fn test_demon_drop_rate() {
        let mut world = playing_world();
        let kills = 2000;
        for _ in 0..kills {
            let mut demon = Monster::spawn(MonsterKind::Demon, IVec2::new(200, 150));
            demon.life = 0;
            world.bury(vec![demon]);
        }
        // Chance 87 means a roll of 1..=86 out of 100 drops
        let rate = world.gems.len() as f64 / kills as f64;
        assert!((0.82..=0.90).contains(&rate), "drop rate {rate}");
    }

    #[test]
    fn test_random_gems_appear_about_once_per_151_ticks() {
        let mut world = playing_world();
        world.monsters = vec![Monster::spawn(MonsterKind::Plant, IVec2::new(-20_000, 100))];
        for _ in 0..3000 {
            world.update();
        }
        assert_eq!(world.phase, KingdomPhase::Playing);
        let count = world.gems.len();
        assert!((5..=40).contains(&count), "{count} gems");
        for gem in &world.gems {
            assert!((20..=MAP_WIDTH - 20).contains(&gem.rect.x));
            assert!((36..=MAP_HEIGHT - 36).contains(&gem.rect.y));
        }
    }

    #[test]
    fn test_ghost_pushes_back() {
        let mut world = playing_world();
        world.monsters = vec![Monster::spawn(MonsterKind::Dino, IVec2::new(300, 100))];
        let ghost = world
            .spells
            .iter_mut()
            .find(|s| s.kind == SpellKind::Ghost)
            .unwrap();
        ghost.active = true;
        ghost.rect = Rect::new(280, 100, 32, 32);

        world.update_spells();
        assert_eq!(world.monsters[0].rect.x, 160);
        assert_eq!(world.monsters[0].life, 4);
    }

    #[test]
    fn test_spells_retire_at_edges() {
        let mut world = playing_world();
        for spell in &mut world.spells {
            spell.active = true;
            spell.rect = match spell.kind {
                SpellKind::Fireball => Rect::new(100, 310, 16, 48),
                SpellKind::Whirlwind => Rect::new(12, 100, 29, 32),
                SpellKind::Ghost => Rect::new(590, 100, 32, 32),
            };
        }
        world.update_spells();
        assert!(world.spells.iter().all(|s| !s.active));
    }

    #[test]
    fn test_monster_reaching_edge_loses() {
        let mut world = playing_world();
        world.monsters = vec![Monster::spawn(MonsterKind::Genie, IVec2::new(597, 100))];
        world.update();
        assert_eq!(world.phase, KingdomPhase::GameOver { won: false });
        assert!(world.drain_events().contains(&KingdomEvent::Defeat));
    }

    #[test]
    fn test_empty_random_wave_announces_final_wave() {
        let mut world = playing_world();
        world.update();
        assert_eq!(world.wave, Wave::Final);
        assert!(matches!(
            world.phase,
            KingdomPhase::Card {
                card: TitleCard::FinalWave,
                ..
            }
        ));
    }

    #[test]
    fn test_final_wave_leads_to_next_level() {
        let mut world = playing_world();
        world.wave = Wave::Final;
        world.gems = vec![Gem::at(IVec2::new(10, 10))];
        world.update();
        assert_eq!(world.level, 2);
        assert_eq!(world.background(), 1);
        assert!(world.gems.is_empty());
        assert_eq!(world.wave, Wave::Random);
    }

    #[test]
    fn test_story_after_levels_four_and_six() {
        let mut world = playing_world();
        world.level = 4;
        world.wave = Wave::Final;
        world.update();
        assert!(matches!(
            world.phase,
            KingdomPhase::Story {
                script: Script::DemonSlain,
                ..
            }
        ));
        world.finish_story(Script::DemonSlain);
        assert_eq!(world.level, 5);

        world.level = 6;
        world.wave = Wave::Final;
        world.phase = KingdomPhase::Playing;
        world.update();
        world.finish_story(Script::DemonLordSlain);
        assert_eq!(world.phase, KingdomPhase::GameOver { won: true });
    }

    #[test]
    fn test_restart_resets_run() {
        let mut world = playing_world();
        world.level = 3;
        world.gems_held = 9;
        world.monsters = vec![Monster::spawn(MonsterKind::Bat, IVec2::ZERO)];
        world.restart();
        assert_eq!(world.level, 1);
        assert_eq!(world.gems_held, 0);
        assert!(world.monsters.is_empty());
        assert_eq!(
            world.phase,
            KingdomPhase::Card {
                card: TitleCard::Level(1),
                ticks_left: TITLE_CARD_TICKS
            }
        );
    }
}
