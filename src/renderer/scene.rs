//! Frame building for both games
//!
//! Turns a world snapshot into a triangle list in logical window pixels.
//! Sprites are drawn as flat shapes.

use glam::Vec2;

use super::shapes::{circle, line, rect, rect_into, rect_outline, ring};
use super::text::{Anchor, Font, text};
use super::vertex::{Vertex, colors};
use crate::consts::{kingdom, shooter};
use crate::sim::Rect;
use crate::sim::kingdom::story::{FINAL_WAVE_TITLE, LOSE_TEXT, WIN_TEXT};
use crate::sim::kingdom::{
    KingdomPhase, KingdomWorld, Monster, MonsterKind, SpellEffect, SpellKind, TitleCard,
    spell_icon_rect,
};
use crate::sim::shooter::{PowerupKind, Powerup, ShooterPhase, ShooterWorld};
use crate::tuning::level_plan;
use crate::unit_to_map;

const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const SEGMENTS: u32 = 24;

/// FPS readout in the top-left corner
pub fn fps_overlay(out: &mut Vec<Vertex>, fps: u32) {
    text(
        out,
        &fps.to_string(),
        Vec2::ZERO,
        Anchor::TopLeft,
        Font::Large,
        1.0,
        GREEN,
    );
}

// ============================================================================
// SQUARE SHOOTER
// ============================================================================

fn map_radius(radius: f32) -> f32 {
    radius * shooter::MAP_SIZE
}

/// Full Square Shooter frame
pub fn shooter_frame(world: &ShooterWorld) -> Vec<Vertex> {
    use shooter::{MAP_HEIGHT, MAP_WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH};

    let mut out = rect(
        Vec2::ZERO,
        Vec2::new(MAP_WIDTH, MAP_HEIGHT),
        colors::SHOOTER_MAP,
    );

    if world.level == 0 {
        shooter_title(&mut out, world);
    } else {
        shooter_world(&mut out, world);
        if world.phase == ShooterPhase::Paused {
            text(
                &mut out,
                "Game paused",
                Vec2::new(MAP_WIDTH / 2.0, MAP_HEIGHT),
                Anchor::MidBottom,
                Font::Large,
                1.0,
                GREEN,
            );
        }
    }

    // The side panel goes on top so nothing spills out of the map
    let panel_x = MAP_WIDTH;
    rect_into(
        &mut out,
        Vec2::new(panel_x, 0.0),
        Vec2::new(WINDOW_WIDTH - MAP_WIDTH, WINDOW_HEIGHT),
        colors::SHOOTER_PANEL,
    );
    let hud_x = panel_x + 20.0;
    for (i, label) in ["Level", "Lives", "Score"].into_iter().enumerate() {
        text(
            &mut out,
            label,
            Vec2::new(hud_x, i as f32 * 96.0),
            Anchor::TopLeft,
            Font::Large,
            2.0,
            colors::BLACK,
        );
    }
    let values = [
        world.level.to_string(),
        world.lives.to_string(),
        world.score.to_string(),
    ];
    for (i, value) in values.iter().enumerate() {
        text(
            &mut out,
            value,
            Vec2::new(hud_x, 48.0 * (2 * i + 1) as f32),
            Anchor::TopLeft,
            Font::Large,
            2.0,
            colors::BLACK,
        );
    }

    if let Some(ship) = &world.ship {
        let mut y = 48.0 * 6.0;
        for kind in PowerupKind::ALL {
            let left = ship.timers.remaining(kind);
            if left > 0.0 {
                let status = powerup_status(kind, left);
                text(
                    &mut out,
                    &status,
                    Vec2::new(hud_x, y),
                    Anchor::TopLeft,
                    Font::Large,
                    1.0,
                    colors::BLACK,
                );
                y += 25.0;
            }
        }
    }

    let play = if world.level == 0 { "[P]lay" } else { "[P]ause" };
    text(
        &mut out,
        play,
        Vec2::new(hud_x, 400.0),
        Anchor::TopLeft,
        Font::Large,
        1.0,
        colors::WHITE,
    );
    text(
        &mut out,
        "[Q]uit",
        Vec2::new(hud_x, 424.0),
        Anchor::TopLeft,
        Font::Large,
        1.0,
        colors::WHITE,
    );

    out
}

fn shooter_title(out: &mut Vec<Vertex>, world: &ShooterWorld) {
    use shooter::{MAP_HEIGHT, MAP_WIDTH};
    let cx = MAP_WIDTH / 2.0;

    let lines = [
        ("FCP", MAP_HEIGHT / 4.0, Anchor::MidBottom, 1.0),
        ("presents", MAP_HEIGHT / 4.0, Anchor::MidTop, 1.0),
        ("SQUARE", MAP_HEIGHT / 2.0, Anchor::MidBottom, 2.0),
        ("SHOOTER", MAP_HEIGHT / 2.0, Anchor::MidTop, 2.0),
    ];
    for (line, y, anchor, scale) in lines {
        text(out, line, Vec2::new(cx, y), anchor, Font::Large, scale, GREEN);
    }

    let three_quarters = MAP_HEIGHT * 0.75;
    text(
        out,
        &format!("High score: {}", world.high_score),
        Vec2::new(cx, three_quarters),
        Anchor::MidBottom,
        Font::Large,
        1.0,
        GREEN,
    );
    text(
        out,
        &format!("Max level: {}", world.max_level),
        Vec2::new(cx, three_quarters),
        Anchor::MidTop,
        Font::Large,
        1.0,
        GREEN,
    );
}

fn shooter_world(out: &mut Vec<Vertex>, world: &ShooterWorld) {
    if let Some(ship) = &world.ship {
        let pos = unit_to_map(ship.pos);
        let r = map_radius(ship.radius);
        out.extend(circle(pos, r, colors::SHIP, SEGMENTS));
        out.extend(ring(pos, r * 0.5 - 1.0, r * 0.5, colors::BLACK, SEGMENTS));
        if ship.has(PowerupKind::Shield) {
            out.extend(rect_outline(
                pos - Vec2::splat(r),
                Vec2::splat(2.0 * r),
                1.0,
                colors::SHIP_SHIELD,
            ));
        }
    }

    let super_bullets = world
        .ship
        .as_ref()
        .is_some_and(|s| s.has(PowerupKind::SuperBullets));
    let bullet_color = if super_bullets {
        colors::SUPER_BULLET
    } else {
        colors::BULLET
    };
    for bullet in &world.bullets {
        out.extend(circle(
            unit_to_map(bullet.pos),
            map_radius(bullet.radius).max(1.0),
            bullet_color,
            8,
        ));
    }

    for bubble in &world.bubbles {
        let color = colors::BUBBLE_PALETTE[bubble.color as usize % colors::BUBBLE_PALETTE.len()];
        let r = map_radius(bubble.radius);
        out.extend(ring(unit_to_map(bubble.pos), r - 1.5, r, color, SEGMENTS));
    }

    for explosion in &world.explosions {
        let r = map_radius(explosion.radius);
        if r > 1.0 {
            out.extend(ring(
                unit_to_map(explosion.pos),
                r - 1.0,
                r,
                colors::EXPLOSION,
                SEGMENTS,
            ));
        }
    }

    for powerup in &world.powerups {
        powerup_icon(out, powerup);
    }
}

fn powerup_icon(out: &mut Vec<Vertex>, powerup: &Powerup) {
    let center = unit_to_map(powerup.pos);
    let r = map_radius(powerup.radius);
    let top_left = center - Vec2::splat(r);
    let size = Vec2::splat(2.0 * r);

    let color = match powerup.kind {
        PowerupKind::Shield => colors::POWERUP_SHIELD,
        PowerupKind::SuperBullets => colors::POWERUP_SUPER,
        PowerupKind::Freeze => colors::POWERUP_FREEZE,
        PowerupKind::Shotgun => colors::POWERUP_SHOTGUN,
    };
    out.extend(rect_outline(top_left, size, 1.0, color));

    match powerup.kind {
        PowerupKind::Shield => out.extend(ring(center, r - 1.0, r, color, SEGMENTS)),
        PowerupKind::SuperBullets => out.extend(ring(center, r * 0.3 - 1.0, r * 0.3, color, 12)),
        PowerupKind::Freeze => {
            for inset in [r * 0.5, r * 0.75] {
                out.extend(rect_outline(
                    top_left + Vec2::splat(inset),
                    size - Vec2::splat(2.0 * inset),
                    1.0,
                    color,
                ));
            }
        }
        PowerupKind::Shotgun => {
            let mid_left = Vec2::new(top_left.x, center.y);
            let right = top_left.x + size.x;
            for y in [top_left.y, center.y, top_left.y + size.y] {
                out.extend(line(mid_left, Vec2::new(right, y), 1.0, color));
            }
        }
    }
}

// ============================================================================
// DEMON KINGDOM
// ============================================================================

fn monster_color(kind: MonsterKind) -> [f32; 4] {
    match kind {
        MonsterKind::Bat => [0.25, 0.2, 0.3, 1.0],
        MonsterKind::Demon => [0.75, 0.1, 0.1, 1.0],
        MonsterKind::DemonLord => [0.5, 0.0, 0.2, 1.0],
        MonsterKind::Dino => [0.3, 0.6, 0.3, 1.0],
        MonsterKind::Genie => [0.3, 0.4, 0.9, 1.0],
        MonsterKind::Golem => [0.5, 0.45, 0.4, 1.0],
        MonsterKind::Ogre => [0.55, 0.6, 0.25, 1.0],
        MonsterKind::Orc => [0.2, 0.5, 0.2, 1.0],
        MonsterKind::Orc2 => [0.25, 0.45, 0.35, 1.0],
        MonsterKind::Plant => [0.1, 0.7, 0.2, 1.0],
        MonsterKind::Skeleton => [0.9, 0.9, 0.85, 1.0],
        MonsterKind::Slime => [0.4, 0.9, 0.5, 0.85],
        MonsterKind::SoulTree => [0.35, 0.2, 0.45, 1.0],
        MonsterKind::Tablet => [0.6, 0.55, 0.5, 1.0],
        MonsterKind::Tree => [0.45, 0.3, 0.15, 1.0],
    }
}

/// HUD line for an active power-up; whole seconds, rounded down
fn powerup_status(kind: PowerupKind, secs_left: f32) -> String {
    format!("{} {}", kind.label(), secs_left as u32)
}

fn rect_vec(r: &Rect) -> (Vec2, Vec2) {
    (
        Vec2::new(r.x as f32, r.y as f32),
        Vec2::new(r.w as f32, r.h as f32),
    )
}

fn draw_monster(out: &mut Vec<Vertex>, monster: &Monster) {
    let (pos, size) = rect_vec(&monster.rect);
    rect_into(out, pos, size, monster_color(monster.kind));

    // A dark band that walks across the body with the animation frame
    let frames = monster.anim.sheet.frames.max(1) as f32;
    let source = monster.anim.source_rect();
    let column = (source.x / source.w.max(1)) as f32;
    let band = (size.x / frames).max(2.0);
    let offset = column * (size.x - band) / (frames - 1.0).max(1.0);
    rect_into(
        out,
        pos + Vec2::new(offset, size.y * 0.7),
        Vec2::new(band, size.y * 0.3),
        [0.0, 0.0, 0.0, 0.35],
    );

    // Health bar
    let bar = pos - Vec2::new(0.0, 20.0);
    rect_into(
        out,
        bar,
        Vec2::new(monster.whole_life as f32 * 10.0, 14.0),
        colors::BLACK,
    );
    rect_into(
        out,
        bar,
        Vec2::new(monster.life as f32 * 10.0, 14.0),
        colors::RED,
    );
}

fn draw_spell(out: &mut Vec<Vertex>, spell: &SpellEffect) {
    let (pos, size) = rect_vec(&spell.rect);
    let center = pos + size / 2.0;
    let wobble = spell.anim.frame as f32;
    match spell.kind {
        SpellKind::Fireball => {
            out.extend(circle(
                center + Vec2::new(0.0, size.y / 4.0),
                size.x / 2.0,
                colors::FIREBALL,
                12,
            ));
            out.extend(line(
                center - Vec2::new(0.0, size.y / 2.0),
                center + Vec2::new(0.0, size.y / 4.0),
                size.x / 2.0 + wobble,
                colors::FIREBALL,
            ));
        }
        SpellKind::Whirlwind => {
            let r = size.x.min(size.y) / 2.0;
            out.extend(ring(center, r * 0.6 + wobble, r, colors::WHIRLWIND, 16));
        }
        SpellKind::Ghost => {
            out.extend(circle(center, size.x / 2.0 - wobble, colors::GHOST, 16));
        }
    }
}

fn kingdom_map(out: &mut Vec<Vertex>, world: &KingdomWorld) {
    use kingdom::{MAP_HEIGHT, MAP_WIDTH, SIDEBAR_HEIGHT, WINDOW_WIDTH};

    rect_into(
        out,
        Vec2::ZERO,
        Vec2::new(MAP_WIDTH as f32, MAP_HEIGHT as f32),
        colors::BACKGROUNDS[world.background()],
    );

    // Sidebar
    rect_into(
        out,
        Vec2::new(0.0, MAP_HEIGHT as f32),
        Vec2::new(WINDOW_WIDTH as f32, SIDEBAR_HEIGHT as f32),
        colors::SIDEBAR,
    );
    text(
        out,
        &format!("{} gems", world.gems_held),
        Vec2::new(10.0, MAP_HEIGHT as f32 + 20.0),
        Anchor::TopLeft,
        Font::Small,
        2.0,
        colors::LIGHT_GRAY,
    );
    for kind in SpellKind::ALL {
        let stats = kind.stats();
        let icon = spell_icon_rect(kind);
        let (pos, size) = rect_vec(&icon);
        let affordable = world.gems_held >= stats.cost;
        let mut preview = SpellEffect::idle(kind);
        let (w, h) = (preview.rect.w.min(icon.w), preview.rect.h.min(icon.h));
        preview.rect = Rect::new(icon.x + (icon.w - w) / 2, icon.y + (icon.h - h) / 2, w, h);
        draw_spell(out, &preview);
        let border = if affordable {
            colors::WHITE
        } else {
            colors::LIGHT_GRAY
        };
        out.extend(rect_outline(pos, size, 1.0, border));

        let below = pos.y + size.y;
        text(
            out,
            &format!("Cost: {}", stats.cost),
            Vec2::new(pos.x, below + 10.0),
            Anchor::TopLeft,
            Font::Small,
            1.0,
            colors::LIGHT_GRAY,
        );
        text(
            out,
            &format!("Hot Key: {}", stats.hotkey),
            Vec2::new(pos.x, below + 25.0),
            Anchor::TopLeft,
            Font::Small,
            1.0,
            colors::LIGHT_GRAY,
        );
    }
    text(
        out,
        "DEMON",
        Vec2::new(360.0, 375.0),
        Anchor::TopLeft,
        Font::Large,
        2.0,
        colors::RED,
    );
    text(
        out,
        "KINGDOM",
        Vec2::new(360.0, 420.0),
        Anchor::TopLeft,
        Font::Large,
        1.5,
        colors::RED,
    );

    for monster in &world.monsters {
        draw_monster(out, monster);
    }

    for gem in &world.gems {
        let (pos, size) = rect_vec(&gem.rect);
        let shine = gem.anim.frame as f32 / gem.anim.sheet.frames.max(1) as f32;
        let mut color = colors::GEM;
        color[0] = (color[0] + shine * 0.5).min(1.0);
        let center = pos + size / 2.0;
        let top = Vec2::new(center.x, pos.y);
        let bottom = Vec2::new(center.x, pos.y + size.y);
        out.extend(line(top, bottom, size.x, color));
        out.extend(line(top, bottom, size.x / 3.0, colors::WHITE));
    }

    for spell in world.spells.iter().filter(|s| s.active) {
        draw_spell(out, spell);
    }
}

/// Full Demon Kingdom frame
pub fn kingdom_frame(world: &KingdomWorld) -> Vec<Vertex> {
    use kingdom::{WINDOW_HEIGHT, WINDOW_WIDTH};

    let mut out = Vec::new();
    let corner = Vec2::new(10.0, 10.0);

    match world.phase {
        KingdomPhase::Story { script, y } => {
            rect_into(
                &mut out,
                Vec2::ZERO,
                Vec2::new(WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32),
                colors::STORY_BACKGROUND,
            );
            for (line_y, line) in script.layout(y) {
                text(
                    &mut out,
                    line,
                    Vec2::new(10.0, line_y as f32),
                    Anchor::TopLeft,
                    Font::Large,
                    1.0,
                    colors::LIGHT_GRAY,
                );
            }
        }
        KingdomPhase::Card { card, .. } => {
            kingdom_map(&mut out, world);
            let title = match card {
                TitleCard::Level(level) => level_plan(level).name,
                TitleCard::FinalWave => FINAL_WAVE_TITLE,
            };
            text(
                &mut out,
                title,
                corner,
                Anchor::TopLeft,
                Font::Large,
                1.0,
                colors::BLACK,
            );
        }
        KingdomPhase::Playing => kingdom_map(&mut out, world),
        KingdomPhase::GameOver { won } => {
            kingdom_map(&mut out, world);
            let message = if won { WIN_TEXT } else { LOSE_TEXT };
            text(
                &mut out,
                message,
                corner,
                Anchor::TopLeft,
                Font::Large,
                1.5,
                colors::BLACK,
            );
        }
    }

    out
}
